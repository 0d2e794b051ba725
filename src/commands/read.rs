//! Read command implementation
//!
//! Low-level register inspection: declared type, size, raw bytes and the
//! decoded value when the type tag has a decoder.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, ReadResult};
use crate::error::Result;
use crate::smc::{IoKitConnector, SmcClient, SmcKey, TypedValue};

/// Execute the read command
pub fn run_read(key_name: &str, format: OutputFormat) -> Result<()> {
    let key = SmcKey::new(key_name)?;

    let client = SmcClient::new(IoKitConnector::new());
    client.open();
    let (info, raw) = client.read_raw(key)?;

    let value = TypedValue::decode(&raw, info.data_type)
        .ok()
        .map(|v| v.as_f64());
    let hex = raw
        .as_slice()
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ");

    print_output(
        &ReadResult {
            key: key.name(),
            data_type: info.tag(),
            size: info.data_size as usize,
            raw: hex,
            value,
        },
        format,
    )?;

    Ok(())
}
