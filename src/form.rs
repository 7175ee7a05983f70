//! Terminal form for birth details.
//!
//! Each number field has fixed bounds and a default that an empty answer
//! takes; answers outside the bounds are refused and asked again. Country
//! and city are picked from the gazetteer, first entry preselected.

use crate::cities::Gazetteer;
use crate::{AstrologyError, BirthInfo, Result};
use chrono::FixedOffset;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberField {
    pub prompt: &'static str,
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl NumberField {
    pub fn check(&self, value: i64) -> std::result::Result<(), String> {
        if (self.min..=self.max).contains(&value) {
            Ok(())
        } else {
            Err(format!(
                "Please enter a whole number between {} and {}.",
                self.min, self.max
            ))
        }
    }
}

/// Year, month, day, hour and minute, in the order they are asked.
pub const FIELDS: [NumberField; 5] = [
    NumberField {
        prompt: "Enter the year (e.g., 2024)",
        min: 2000,
        max: 2100,
        default: 2024,
    },
    NumberField {
        prompt: "Enter the month (1-12)",
        min: 1,
        max: 12,
        default: 7,
    },
    NumberField {
        prompt: "Enter the day (1-31)",
        min: 1,
        max: 31,
        default: 14,
    },
    NumberField {
        prompt: "Enter the hour (0-23)",
        min: 0,
        max: 23,
        default: 12,
    },
    NumberField {
        prompt: "Enter the minute (0-59)",
        min: 0,
        max: 59,
        default: 0,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthDetails {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub country: String,
    pub city: String,
}

impl BirthDetails {
    /// Builds details from answers in [`FIELDS`] order, rechecking each bound.
    pub fn from_answers(answers: [i64; 5], country: String, city: String) -> Result<Self> {
        for (field, &value) in FIELDS.iter().zip(answers.iter()) {
            field.check(value).map_err(AstrologyError::InvalidInput)?;
        }
        let [year, month, day, hour, minute] = answers;
        let narrow = |value: i64| {
            u32::try_from(value)
                .map_err(|_| AstrologyError::InvalidInput(format!("{value} is out of range")))
        };
        Ok(BirthDetails {
            year: i32::try_from(year)
                .map_err(|_| AstrologyError::InvalidInput(format!("year {year} is out of range")))?,
            month: narrow(month)?,
            day: narrow(day)?,
            hour: narrow(hour)?,
            minute: narrow(minute)?,
            country,
            city,
        })
    }

    /// What the form returns when every answer is left empty.
    pub fn defaults(gazetteer: &Gazetteer) -> Result<Self> {
        let country = first(&gazetteer.countries(), "countries")?;
        let city = first(&gazetteer.cities(&country)?, "cities")?;
        BirthDetails::from_answers(FIELDS.map(|field| field.default), country, city)
    }

    pub fn to_birth_info(&self, gazetteer: &Gazetteer, offset: FixedOffset) -> Result<BirthInfo> {
        let location = gazetteer.lookup(&self.country, &self.city)?;
        BirthInfo::from_local(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            offset,
            location,
        )
    }
}

fn first(options: &[&str], what: &str) -> Result<String> {
    options
        .first()
        .map(|option| option.to_string())
        .ok_or_else(|| AstrologyError::InvalidInput(format!("no {what} to choose from")))
}

fn choose(theme: &ColorfulTheme, prompt: &str, options: &[&str]) -> Result<usize> {
    if options.is_empty() {
        return Err(AstrologyError::InvalidInput(format!(
            "nothing to choose for '{prompt}'"
        )));
    }
    Ok(Select::with_theme(theme)
        .with_prompt(prompt)
        .items(options)
        .default(0)
        .interact()?)
}

/// Asks for every field on the terminal. Prompts are written to stderr.
pub fn run(gazetteer: &Gazetteer) -> Result<BirthDetails> {
    let theme = ColorfulTheme::default();

    let mut answers = [0i64; 5];
    for (answer, &field) in answers.iter_mut().zip(FIELDS.iter()) {
        *answer = Input::<i64>::with_theme(&theme)
            .with_prompt(field.prompt)
            .default(field.default)
            .validate_with(move |value: &i64| field.check(*value))
            .interact_text()?;
        debug!(prompt = field.prompt, answer = *answer, "accepted answer");
    }

    let countries = gazetteer.countries();
    let country = countries[choose(&theme, "Select the country", &countries)?].to_string();
    let cities = gazetteer.cities(&country)?;
    let city = cities[choose(&theme, "Select the city", &cities)?].to_string();

    BirthDetails::from_answers(answers, country, city)
}
