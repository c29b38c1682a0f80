use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mplb_player::PropertyValue;
use mplb_schema::{CommandDescriptor, PropertyDescriptor, Value};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_commands(commands: &[CommandDescriptor], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(commands).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "ARGS", "REQUIRED"]);
            for desc in commands {
                table.add_row(vec![
                    desc.name().to_string(),
                    arg_summary(desc),
                    desc.required().to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for desc in commands {
                println!(
                    "{} {} (required: {})",
                    desc.name(),
                    arg_summary(desc),
                    desc.required()
                );
            }
        }
    }
}

pub fn print_properties(properties: &[PropertyDescriptor], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(properties).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PROPERTY", "TYPE", "LIST", "MIN", "MAX"]);
            for desc in properties {
                table.add_row(vec![
                    desc.name().to_string(),
                    desc.value_type().to_string(),
                    if desc.is_list() { "yes" } else { "no" }.to_string(),
                    bound_text(desc.min()),
                    bound_text(desc.max()),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for desc in properties {
                println!(
                    "{}: {}{} [{}, {}]",
                    desc.name(),
                    desc.value_type(),
                    if desc.is_list() { " list" } else { "" },
                    bound_text(desc.min()),
                    bound_text(desc.max()),
                );
            }
        }
    }
}

pub fn print_property_value(name: &str, value: Option<&PropertyValue>, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", property_json(value)),
        OutputFormat::Table | OutputFormat::Pretty => match value {
            Some(value) => println!("{name}={}", property_text(value)),
            None => println!("{name} is unavailable"),
        },
    }
}

fn property_json(value: Option<&PropertyValue>) -> String {
    let json = match value {
        None => Ok("null".to_string()),
        Some(PropertyValue::Scalar(v)) => serde_json::to_string(v),
        Some(PropertyValue::List(items)) => serde_json::to_string(items),
    };
    json.unwrap_or_else(|_| "null".to_string())
}

fn property_text(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Scalar(v) => v.to_string(),
        PropertyValue::List(items) => items
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn arg_summary(desc: &CommandDescriptor) -> String {
    desc.arg_types()
        .iter()
        .enumerate()
        .map(|(i, ty)| {
            if i < desc.required() {
                ty.to_string()
            } else {
                format!("[{ty}]")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bound_text(bound: Option<&Value>) -> String {
    match bound {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use mplb_schema::ValueType;

    use super::*;

    #[test]
    fn arg_summary_marks_optional_args() {
        let desc = CommandDescriptor::new("seek", vec![ValueType::Float, ValueType::Int], 1);
        assert_eq!(arg_summary(&desc), "float [integer]");
    }

    #[test]
    fn bound_text_renders_absent_as_dash() {
        assert_eq!(bound_text(None), "-");
        assert_eq!(bound_text(Some(&Value::Int(5))), "5");
    }

    #[test]
    fn property_text_joins_list_elements() {
        let value = PropertyValue::List(vec![Value::Float(1.0), Value::Float(1.5)]);
        assert_eq!(property_text(&value), "1,1.5");
    }

    #[test]
    fn property_json_renders_unavailable_as_null() {
        assert_eq!(property_json(None), "null");
        assert_eq!(
            property_json(Some(&PropertyValue::Scalar(Value::Bool(true)))),
            "true"
        );
    }
}
