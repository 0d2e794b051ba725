//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::domain::{Fan, SensorReading};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Fan list for display
#[derive(Debug, Clone, Serialize)]
pub struct FanList {
    pub fans: Vec<Fan>,
}

impl TableDisplay for FanList {
    fn to_table(&self) -> String {
        if self.fans.is_empty() {
            return "No fans found".to_string();
        }

        let mut output = format!("Fans Found: {}\n\n", self.fans.len());
        for fan in &self.fans {
            output.push_str(&format!(
                "[{}] {}\n  Current: {:.0} RPM\n  Target: {:.0} RPM{}\n  Range: {:.0} - {:.0} RPM\n",
                fan.id,
                fan.name,
                fan.current_rpm,
                fan.target_rpm,
                if fan.manual { " (manual)" } else { "" },
                fan.min_rpm,
                fan.max_rpm
            ));
        }

        output
    }

    fn to_compact(&self) -> String {
        self.fans
            .iter()
            .map(|f| format!("{}:{:.0}rpm", f.id, f.current_rpm))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Sensor readings for display
#[derive(Debug, Clone, Serialize)]
pub struct SensorList {
    pub sensors: Vec<SensorReading>,
}

impl TableDisplay for SensorList {
    fn to_table(&self) -> String {
        if self.sensors.is_empty() {
            return "No sensors answered".to_string();
        }

        let mut output = String::new();
        for reading in &self.sensors {
            output.push_str(&format!(
                "{:<20} {:>8.1} {:<3} [{}]\n",
                reading.label, reading.value, reading.unit, reading.key
            ));
        }

        output
    }

    fn to_compact(&self) -> String {
        self.sensors
            .iter()
            .map(|r| format!("{}={:.1}{}", r.key, r.value, r.unit))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Single register read for display
#[derive(Debug, Clone, Serialize)]
pub struct ReadResult {
    pub key: String,
    pub data_type: String,
    pub size: usize,
    pub raw: String,
    pub value: Option<f64>,
}

impl TableDisplay for ReadResult {
    fn to_table(&self) -> String {
        let mut output = format!(
            "Key: {}\n  Type: {}\n  Size: {} bytes\n  Raw: {}\n",
            self.key, self.data_type, self.size, self.raw
        );

        match self.value {
            Some(value) => output.push_str(&format!("  Value: {}\n", value)),
            None => output.push_str("  Value: (no decoder for this type)\n"),
        }

        output
    }

    fn to_compact(&self) -> String {
        match self.value {
            Some(value) => format!("{}={}", self.key, value),
            None => format!("{}={}", self.key, self.raw),
        }
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_list_table() {
        let list = FanList {
            fans: vec![Fan::new(0, 1800.0, 1200.0, 6000.0, 1800.0)],
        };

        let output = list.to_table();
        assert!(output.contains("Fan 1"));
        assert!(output.contains("1800 RPM"));
        assert!(output.contains("1200 - 6000 RPM"));
    }

    #[test]
    fn test_fan_list_empty() {
        let list = FanList { fans: Vec::new() };
        assert_eq!(list.to_table(), "No fans found");
    }

    #[test]
    fn test_sensor_list_table() {
        let list = SensorList {
            sensors: vec![SensorReading {
                label: "GPU temperature".to_string(),
                key: "TG0P".to_string(),
                value: 42.5,
                unit: "°C".to_string(),
            }],
        };

        let output = list.to_table();
        assert!(output.contains("GPU temperature"));
        assert!(output.contains("42.5"));
        assert!(output.contains("TG0P"));
    }

    #[test]
    fn test_read_result_without_decoder() {
        let result = ReadResult {
            key: "FNum".to_string(),
            data_type: "{fan".to_string(),
            size: 1,
            raw: "02".to_string(),
            value: None,
        };

        assert!(result.to_table().contains("no decoder"));
        assert_eq!(result.to_compact(), "FNum=02");
    }

    #[test]
    fn test_message_display() {
        let msg = Message {
            message: "Fan 0 target set to 3500 RPM".to_string(),
            success: true,
        };

        assert!(msg.to_table().starts_with('✓'));
    }
}
