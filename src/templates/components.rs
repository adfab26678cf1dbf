use chrono::NaiveDateTime;
use maud::{html, Markup};

use crate::services::{queries::ShowSlot, FormBag};

/// Genres offered by the venue and artist forms.
pub const GENRE_CHOICES: [&str; 19] = [
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot advisory message shown at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

pub fn flash_banner(flash: Option<&Flash>) -> Markup {
    let Some(flash) = flash else {
        return html! {};
    };

    let (class, icon) = match flash.kind {
        FlashKind::Success => ("flash flash-success bg-green-50 text-green-800", "✓"),
        FlashKind::Error => ("flash flash-error bg-red-50 text-red-800", "✗"),
    };

    html! {
        div class=(format!("p-4 mb-6 rounded-md {}", class)) role="alert" {
            span class="font-bold mr-2" { (icon) }
            span { (flash.message) }
        }
    }
}

pub fn format_start_time(start_time: &NaiveDateTime) -> String {
    start_time.format("%Y-%m-%d %H:%M").to_string()
}

pub fn genre_tags<'a>(genres: impl IntoIterator<Item = &'a str>) -> Markup {
    html! {
        div class="flex flex-wrap gap-2" {
            @for genre in genres {
                span class="px-2 py-1 bg-gray-100 text-gray-700 text-sm rounded" { (genre) }
            }
        }
    }
}

/// Card for one show on a venue or artist page. `link_prefix` is the path
/// of the counterpart, e.g. `/artists` on a venue page.
pub fn show_slot_card(slot: &ShowSlot, link_prefix: &str) -> Markup {
    html! {
        a href=(format!("{}/{}", link_prefix, slot.counterpart_id))
          class="flex items-center space-x-4 bg-white rounded-lg shadow-sm p-4 hover:shadow-md" {
            img src=(slot.counterpart_image_link)
                alt=(slot.counterpart_name)
                class="w-16 h-16 rounded object-cover"
                loading="lazy";
            div {
                p class="font-semibold text-gray-900" { (slot.counterpart_name) }
                p class="text-sm text-gray-600" { (format_start_time(&slot.start_time)) }
            }
        }
    }
}

pub fn show_section(title: &str, slots: &[ShowSlot], link_prefix: &str) -> Markup {
    html! {
        section class="mt-8" {
            h2 class="text-xl font-semibold mb-4" { (slots.len()) " " (title) }
            @if slots.is_empty() {
                p class="text-gray-500" { "No shows." }
            } @else {
                div class="grid grid-cols-1 md:grid-cols-2 gap-4" {
                    @for slot in slots {
                        (show_slot_card(slot, link_prefix))
                    }
                }
            }
        }
    }
}

pub fn search_box(action: &str, placeholder: &str) -> Markup {
    html! {
        form method="post" action=(action) class="mb-6 flex space-x-2" {
            input
                type="search"
                name="search_term"
                placeholder=(placeholder)
                class="flex-grow px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-primary";
            button type="submit" class="px-4 py-2 bg-primary text-white font-semibold rounded-md" { "Search" }
        }
    }
}

fn field_value<'a>(values: &'a FormBag, name: &str) -> &'a str {
    values.values(name).first().copied().unwrap_or("")
}

pub fn text_field(values: &FormBag, name: &str, label: &str, required: bool) -> Markup {
    html! {
        div {
            label for=(name) class="block text-sm font-medium text-gray-700 mb-2" { (label) }
            input
                type="text"
                id=(name)
                name=(name)
                value=(field_value(values, name))
                required[required]
                class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-primary";
        }
    }
}

pub fn genre_select(values: &FormBag) -> Markup {
    let selected = values.list("genres");
    html! {
        div {
            label for="genres" class="block text-sm font-medium text-gray-700 mb-2" { "Genres" }
            select id="genres" name="genres" multiple
                class="w-full px-3 py-2 border border-gray-300 rounded-md h-40" {
                @for genre in GENRE_CHOICES {
                    @let is_selected = selected.iter().any(|g| g == genre);
                    option value=(genre) selected[is_selected] { (genre) }
                }
            }
        }
    }
}

pub fn checkbox_field(values: &FormBag, name: &str, label: &str) -> Markup {
    let checked = values.flag(name).unwrap_or(false);
    html! {
        div class="flex items-center space-x-2" {
            input type="checkbox" id=(name) name=(name) value="y" checked[checked];
            label for=(name) class="text-sm font-medium text-gray-700" { (label) }
        }
    }
}

pub fn submit_button(label: &str) -> Markup {
    html! {
        button type="submit"
            class="w-full bg-primary hover:bg-green-600 text-white font-semibold py-2 px-4 rounded-md transition" {
            (label)
        }
    }
}
