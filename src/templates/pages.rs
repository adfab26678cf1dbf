use maud::{html, Markup};

use super::components::{
    checkbox_field, flash_banner, format_start_time, genre_select, genre_tags, search_box,
    show_section, submit_button, text_field, Flash,
};
use super::layout::base_layout;
use crate::services::{
    queries::{Area, ArtistDetail, ArtistSummary, SearchResults, ShowListing, VenueDetail},
    FormBag,
};

pub fn home_page(flash: Option<&Flash>) -> Markup {
    base_layout(
        "Home",
        html! {
            (flash_banner(flash))

            div class="text-center py-12" {
                h1 class="text-4xl font-bold text-gray-900" { "Fyyur" }
                p class="mt-4 text-gray-600" { "Find venues, discover artists and book shows." }

                div class="mt-8 flex justify-center space-x-4" {
                    a href="/venues/create" class="px-4 py-2 bg-primary text-white font-semibold rounded-md" { "Post a venue" }
                    a href="/artists/create" class="px-4 py-2 bg-primary text-white font-semibold rounded-md" { "Post an artist" }
                    a href="/shows/create" class="px-4 py-2 bg-primary text-white font-semibold rounded-md" { "Post a show" }
                }
            }
        },
    )
}

pub fn venues_page(areas: &[Area]) -> Markup {
    base_layout(
        "Venues",
        html! {
            h1 class="text-3xl font-bold text-gray-900 mb-6" { "Venues" }
            (search_box("/venues/search", "Find a venue"))

            @if areas.is_empty() {
                p class="text-gray-600" { "No venues listed yet." }
            }
            @for area in areas {
                section class="mb-8" {
                    h2 class="text-xl font-semibold mb-3" { (area.city) ", " (area.state) }
                    ul class="space-y-2" {
                        @for venue in &area.venues {
                            li {
                                a href=(format!("/venues/{}", venue.id)) class="text-primary hover:underline" {
                                    (venue.name)
                                }
                                span class="ml-2 text-sm text-gray-500" {
                                    (venue.upcoming_shows) " upcoming shows"
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn artists_page(artists: &[ArtistSummary]) -> Markup {
    base_layout(
        "Artists",
        html! {
            h1 class="text-3xl font-bold text-gray-900 mb-6" { "Artists" }
            (search_box("/artists/search", "Find an artist"))

            @if artists.is_empty() {
                p class="text-gray-600" { "No artists listed yet." }
            }
            ul class="space-y-2" {
                @for artist in artists {
                    li {
                        a href=(format!("/artists/{}", artist.id)) class="text-primary hover:underline" {
                            (artist.name)
                        }
                    }
                }
            }
        },
    )
}

/// Search results for venues or artists; `path` is `/venues` or `/artists`.
pub fn search_page(path: &str, results: &SearchResults) -> Markup {
    base_layout(
        "Search",
        html! {
            (search_box(&format!("{}/search", path), "Search again"))

            h1 class="text-2xl font-bold text-gray-900 mb-6" {
                "Number of search results for \"" (results.search_term) "\": " (results.count)
            }

            ul class="space-y-2" {
                @for hit in &results.data {
                    li {
                        a href=(format!("{}/{}", path, hit.id)) class="text-primary hover:underline" {
                            (hit.name)
                        }
                        span class="ml-2 text-sm text-gray-500" {
                            (hit.num_upcoming_shows) " upcoming shows"
                        }
                    }
                }
            }
        },
    )
}

pub fn venue_detail_page(detail: &VenueDetail) -> Markup {
    let venue = &detail.venue;
    base_layout(
        &venue.name,
        html! {
            div class="flex flex-col md:flex-row gap-6" {
                img src=(venue.image_link) alt=(venue.name) class="w-full md:w-64 rounded-lg shadow-md";

                div class="flex-grow space-y-2" {
                    h1 class="text-3xl font-bold text-gray-900" { (venue.name) }
                    p class="text-sm text-gray-500" { "ID: " (venue.id) }
                    @if !venue.genres.is_empty() {
                        (genre_tags(venue.genres.iter()))
                    }
                    @if !venue.address.is_empty() {
                        p { (venue.address) }
                    }
                    p { (venue.city) ", " (venue.state) }
                    p { (venue.phone) }
                    p { a href=(venue.website) class="text-primary hover:underline" { (venue.website) } }
                    p { a href=(venue.facebook_link) class="text-primary hover:underline" { (venue.facebook_link) } }

                    @if venue.seeking_talent {
                        div class="p-4 bg-green-50 rounded-md" {
                            p class="font-semibold" { "Currently seeking talent" }
                            p { (venue.seeking_description) }
                        }
                    } @else {
                        p class="text-gray-500" { "Not currently seeking talent" }
                    }

                    div class="flex space-x-3 pt-4" {
                        a href=(format!("/venues/{}/edit", venue.id)) class="px-4 py-2 bg-blue-500 text-white font-semibold rounded-md" { "Edit" }
                        button
                            class="px-4 py-2 bg-red-500 text-white font-semibold rounded-md"
                            hx-delete=(format!("/venues/{}", venue.id))
                            hx-confirm="Delete this venue and all of its shows?"
                            hx-target="body" {
                            "Delete"
                        }
                    }
                }
            }

            (show_section("Upcoming Shows", &detail.shows.upcoming_shows, "/artists"))
            (show_section("Past Shows", &detail.shows.past_shows, "/artists"))
        },
    )
}

pub fn artist_detail_page(detail: &ArtistDetail) -> Markup {
    let artist = &detail.artist;
    base_layout(
        &artist.name,
        html! {
            div class="flex flex-col md:flex-row gap-6" {
                img src=(artist.image_link) alt=(artist.name) class="w-full md:w-64 rounded-lg shadow-md";

                div class="flex-grow space-y-2" {
                    h1 class="text-3xl font-bold text-gray-900" { (artist.name) }
                    p class="text-sm text-gray-500" { "ID: " (artist.id) }
                    @if !artist.genres.is_empty() {
                        (genre_tags(artist.genres.iter()))
                    }
                    p { (artist.city) ", " (artist.state) }
                    p { (artist.phone) }
                    p { a href=(artist.website) class="text-primary hover:underline" { (artist.website) } }
                    p { a href=(artist.facebook_link) class="text-primary hover:underline" { (artist.facebook_link) } }

                    @if artist.seeking_venue {
                        div class="p-4 bg-green-50 rounded-md" {
                            p class="font-semibold" { "Currently seeking performance venues" }
                            p { (artist.seeking_description) }
                        }
                    } @else {
                        p class="text-gray-500" { "Not currently seeking performance venues" }
                    }

                    div class="flex space-x-3 pt-4" {
                        a href=(format!("/artists/{}/edit", artist.id)) class="px-4 py-2 bg-blue-500 text-white font-semibold rounded-md" { "Edit" }
                        button
                            class="px-4 py-2 bg-red-500 text-white font-semibold rounded-md"
                            hx-delete=(format!("/artists/{}", artist.id))
                            hx-confirm="Delete this artist and all of their shows?"
                            hx-target="body" {
                            "Delete"
                        }
                    }
                }
            }

            (show_section("Upcoming Shows", &detail.shows.upcoming_shows, "/venues"))
            (show_section("Past Shows", &detail.shows.past_shows, "/venues"))
        },
    )
}

pub fn shows_page(shows: &[ShowListing]) -> Markup {
    base_layout(
        "Shows",
        html! {
            h1 class="text-3xl font-bold text-gray-900 mb-6" { "Shows" }

            @if shows.is_empty() {
                p class="text-gray-600" { "No shows booked yet." }
            }
            div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6" {
                @for show in shows {
                    div class="bg-white rounded-lg shadow-md overflow-hidden" {
                        img src=(show.artist_image_link) alt=(show.artist_name) class="w-full h-48 object-cover" loading="lazy";
                        div class="p-4" {
                            p class="text-sm text-gray-500" { (format_start_time(&show.start_time)) }
                            a href=(format!("/artists/{}", show.artist_id)) class="block font-semibold text-gray-900 hover:underline" {
                                (show.artist_name)
                            }
                            p class="text-sm text-gray-600" {
                                "playing at "
                                a href=(format!("/venues/{}", show.venue_id)) class="hover:underline" { (show.venue_name) }
                            }
                        }
                    }
                }
            }
        },
    )
}

/// Create or edit form for a venue. `action` is the form's POST target.
pub fn venue_form_page(title: &str, action: &str, values: &FormBag, flash: Option<&Flash>) -> Markup {
    base_layout(
        title,
        html! {
            div class="max-w-2xl mx-auto" {
                h1 class="text-3xl font-bold text-gray-900 mb-6" { (title) }
                (flash_banner(flash))

                form method="post" action=(action) class="bg-white rounded-lg shadow-sm p-6 space-y-4" {
                    (text_field(values, "name", "Name", true))
                    (text_field(values, "city", "City", true))
                    (text_field(values, "state", "State", true))
                    (text_field(values, "address", "Address", false))
                    (text_field(values, "phone", "Phone", true))
                    (genre_select(values))
                    (text_field(values, "image_link", "Image link", true))
                    (text_field(values, "facebook_link", "Facebook link", true))
                    (text_field(values, "website", "Website", true))
                    (checkbox_field(values, "seeking_talent", "Seeking talent"))
                    (text_field(values, "seeking_description", "Seeking description", false))
                    (submit_button(title))
                }
            }
        },
    )
}

pub fn artist_form_page(title: &str, action: &str, values: &FormBag, flash: Option<&Flash>) -> Markup {
    base_layout(
        title,
        html! {
            div class="max-w-2xl mx-auto" {
                h1 class="text-3xl font-bold text-gray-900 mb-6" { (title) }
                (flash_banner(flash))

                form method="post" action=(action) class="bg-white rounded-lg shadow-sm p-6 space-y-4" {
                    (text_field(values, "name", "Name", true))
                    (text_field(values, "city", "City", true))
                    (text_field(values, "state", "State", true))
                    (text_field(values, "phone", "Phone", true))
                    (genre_select(values))
                    (text_field(values, "image_link", "Image link", true))
                    (text_field(values, "facebook_link", "Facebook link", true))
                    (text_field(values, "website", "Website", true))
                    (checkbox_field(values, "seeking_venue", "Seeking venues"))
                    (text_field(values, "seeking_description", "Seeking description", false))
                    (submit_button(title))
                }
            }
        },
    )
}

pub fn show_form_page(values: &FormBag, flash: Option<&Flash>) -> Markup {
    base_layout(
        "New show",
        html! {
            div class="max-w-2xl mx-auto" {
                h1 class="text-3xl font-bold text-gray-900 mb-6" { "List a new show" }
                (flash_banner(flash))

                form method="post" action="/shows/create" class="bg-white rounded-lg shadow-sm p-6 space-y-4" {
                    (text_field(values, "artist_id", "Artist ID", true))
                    (text_field(values, "venue_id", "Venue ID", true))
                    (text_field(values, "start_time", "Start time (YYYY-MM-DD HH:MM:SS)", true))
                    (submit_button("Create show"))
                }
            }
        },
    )
}

pub fn not_found_page() -> Markup {
    base_layout(
        "Not found",
        html! {
            div class="text-center py-12" {
                h1 class="text-4xl font-bold text-gray-900" { "404" }
                p class="mt-4 text-gray-600" { "Not found. The page you are looking for does not exist." }
                a href="/" class="mt-6 inline-block text-primary hover:underline" { "Back home" }
            }
        },
    )
}

pub fn server_error_page() -> Markup {
    base_layout(
        "Server error",
        html! {
            div class="text-center py-12" {
                h1 class="text-4xl font-bold text-gray-900" { "500" }
                p class="mt-4 text-gray-600" { "Something went wrong on our side. Please try again." }
                a href="/" class="mt-6 inline-block text-primary hover:underline" { "Back home" }
            }
        },
    )
}
