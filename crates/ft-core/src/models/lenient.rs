use serde::{Deserialize, Deserializer};

/// Read an explicit `null` as the field's default.
///
/// `#[serde(default)]` only covers absent keys; the API also sends `null`
/// for optional columns it has no value for.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
