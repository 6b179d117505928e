//! Field deserializers that read an explicit `null` as "not given".

use serde::{Deserialize, Deserializer};

use crate::spec::{form, question};

/// `null` becomes `T::default()`.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn or_else<'de, D, T>(deserializer: D, fallback: fn() -> T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_else(fallback))
}

pub(crate) fn form_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    or_else(deserializer, form::default_form_title)
}

pub(crate) fn is_quiz<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    or_else(deserializer, form::default_is_quiz)
}

pub(crate) fn kind<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    or_else(deserializer, question::default_kind)
}

pub(crate) fn title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    or_else(deserializer, question::default_title)
}

pub(crate) fn points<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    or_else(deserializer, question::default_points)
}

pub(crate) fn low<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    or_else(deserializer, question::default_low)
}

pub(crate) fn high<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    or_else(deserializer, question::default_high)
}
