// SPDX-License-Identifier: GPL-3.0-only

//! Formatting rules shared by the table and the details dialog.

use std::time::Duration;

use cosmic::iced::Color;

/// Upper bound of a stat bar, in percent
pub const STAT_BAR_MAX: f32 = 100.0;

/// Base stat value that maps to a full bar
const STAT_BAR_SCALE: f32 = 1.5;

/// Uppercases the first character and leaves the rest untouched.
pub fn capitalize_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first_char) => first_char.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Transforms a kebab-case string into a space-separated string where each word starts with an uppercase letter.
pub fn capitalize_string(input: &str) -> String {
    input
        .split('-')
        .map(capitalize_first)
        .collect::<Vec<String>>()
        .join(" ")
}

/// Helper to scale some data from PokeApi such as weight...
/// scales a number down by dividing it by 10, converting it to a floating-point
pub fn scale_numbers(num: i64) -> f64 {
    (num as f64) / 10.0
}

/// Decimetres to metres, `7` becomes `0.7 m`
pub fn format_height(height: i64) -> String {
    format!("{} m", scale_numbers(height))
}

/// Hectograms to kilograms, `69` becomes `6.9 kg`
pub fn format_weight(weight: i64) -> String {
    format!("{} kg", scale_numbers(weight))
}

/// Fill percentage of a stat bar: `value / 1.5`, clamped to `0..=100`
pub fn stat_bar_width(value: i64) -> f32 {
    (value as f32 / STAT_BAR_SCALE).clamp(0.0, STAT_BAR_MAX)
}

/// Milliseconds with two decimals, the unit is added by the caller
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64() * 1000.0)
}

/// Comma-joined abilities, `None` when the backend sent no list at all
pub fn abilities_label(abilities: Option<&[String]>) -> Option<String> {
    abilities.map(|abilities| abilities.join(", "))
}

/// Badge colour of a Pokémon type, unknown types share the `???` colour
pub fn type_color(pokemon_type: &str) -> Color {
    match pokemon_type {
        "normal" => Color::from_rgb8(168, 168, 120),
        "fire" => Color::from_rgb8(240, 128, 48),
        "water" => Color::from_rgb8(104, 144, 240),
        "electric" => Color::from_rgb8(248, 208, 48),
        "grass" => Color::from_rgb8(120, 200, 80),
        "ice" => Color::from_rgb8(152, 216, 216),
        "fighting" => Color::from_rgb8(192, 48, 40),
        "poison" => Color::from_rgb8(160, 64, 160),
        "ground" => Color::from_rgb8(224, 192, 104),
        "flying" => Color::from_rgb8(168, 144, 240),
        "psychic" => Color::from_rgb8(248, 88, 136),
        "bug" => Color::from_rgb8(168, 184, 32),
        "rock" => Color::from_rgb8(184, 160, 56),
        "ghost" => Color::from_rgb8(112, 88, 152),
        "dragon" => Color::from_rgb8(112, 56, 248),
        "dark" => Color::from_rgb8(112, 88, 72),
        "steel" => Color::from_rgb8(184, 184, 208),
        "fairy" => Color::from_rgb8(238, 153, 172),
        _ => Color::from_rgb8(104, 160, 144),
    }
}
