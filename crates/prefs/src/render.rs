use clap::ValueEnum;
use serde_json::Value;

use crate::command::Cli;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::upper_case_acronyms)]
pub(crate) enum Output {
    JSON,
    TSV,
    None,
}

pub enum CommandOutput {
    Plain(String),
    Object(Value),
}
pub type CommandResult = color_eyre::eyre::Result<CommandOutput>;

impl From<&str> for CommandOutput {
    fn from(text: &str) -> Self {
        CommandOutput::Plain(text.to_owned())
    }
}
impl From<String> for CommandOutput {
    fn from(text: String) -> Self {
        CommandOutput::Plain(text)
    }
}
impl From<()> for CommandOutput {
    fn from(_: ()) -> Self {
        CommandOutput::Plain(String::new())
    }
}

pub struct RenderConfig {
    pub output: Output,
    pub quiet: bool,
}

impl RenderConfig {
    pub fn new(cli: &Cli) -> Self {
        Self {
            output: cli.output,
            quiet: cli.quiet,
        }
    }

    pub fn render_result(&self, result: CommandResult) -> color_eyre::eyre::Result<()> {
        match result {
            // Errors will be passed through to the caller, and rendered by the main function
            Err(e) => Err(e),

            Ok(_) if self.quiet || self.output == Output::None => Ok(()),

            // Plain text is just output as is
            Ok(CommandOutput::Plain(text)) => {
                if !text.is_empty() {
                    println!("{}", text);
                }
                Ok(())
            }

            // For objects, we serialize them based on the output format,
            Ok(CommandOutput::Object(obj)) => {
                match self.output {
                    Output::JSON => {
                        println!("{}", serde_json::to_string_pretty(&obj)?);
                    }
                    Output::TSV => {
                        print!("{}", to_tsv(&obj));
                    }
                    Output::None => unreachable!(),
                }
                Ok(())
            }
        }
    }
}

/// Render an array of flat objects as tab separated rows, with a header taken from the
/// first object's fields. Anything else is rendered as a single compact JSON row.
fn to_tsv(value: &Value) -> String {
    let Some(rows) = value.as_array() else {
        return format!("{}\n", value);
    };
    let Some(columns) = rows
        .first()
        .and_then(Value::as_object)
        .map(|first| first.keys().cloned().collect::<Vec<_>>())
    else {
        return rows.iter().map(|row| format!("{}\n", cell(row))).collect();
    };

    let mut out = columns.join("\t");
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| row.get(column).map(cell).unwrap_or_default())
            .collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    out
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tsv_of_objects() {
        let value = json!([
            { "name": "theme", "value": "dark", "stored": true },
            { "name": "tags", "value": null, "stored": false },
        ]);
        // serde_json orders object keys alphabetically
        assert_eq!(
            to_tsv(&value),
            "name\tstored\tvalue\ntheme\ttrue\tdark\ntags\tfalse\t\n"
        );
    }

    #[test]
    fn test_tsv_of_scalars() {
        assert_eq!(to_tsv(&json!(["a", "b"])), "a\nb\n");
        assert_eq!(to_tsv(&json!("x")), "\"x\"\n");
    }
}
