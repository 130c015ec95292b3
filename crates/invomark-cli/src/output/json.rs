use invomark_core::error::InvomarkError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), InvomarkError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
