use serde::de::DeserializeOwned;

/// Deserialize a config document; errors name the JSON path of the bad value.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    let value = serde_path_to_error::deserialize::<_, T>(&mut *de).map_err(|err| {
        let path = err.path().to_string();
        format!("at JSON path {path} → {}", err.into_inner())
    })?;
    de.end().map_err(|err| format!("trailing input → {err}"))?;
    Ok(value)
}
