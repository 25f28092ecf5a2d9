use serde::Serialize;

use crate::error::CliError;

pub fn render<T: Serialize>(payload: &T, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(payload)?
    } else {
        serde_json::to_string(payload)?
    };
    println!("{payload}");
    Ok(())
}
