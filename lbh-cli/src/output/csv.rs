//! CSV rendering.
//!
//! Cells are taken from the serde form of each row. Missing and null fields
//! are empty cells, list fields are joined with `;`.

use serde::Serialize;
use serde_json::Value;

use super::Column;

/// Header line from `columns`, then one line per row.
///
/// The header is written even when there are no rows.
pub fn rows_csv<T: Serialize>(rows: &[T], columns: &[Column]) -> String {
    let mut lines = vec![columns
        .iter()
        .map(|c| escape(c.header))
        .collect::<Vec<_>>()
        .join(",")];
    for row in rows {
        let value = serde_json::to_value(row).unwrap_or(Value::Null);
        lines.push(
            columns
                .iter()
                .map(|c| cell(value.get(c.key)))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

/// Field names of a single serialized struct, then its values.
pub fn record_csv<T: Serialize + ?Sized>(data: &T) -> String {
    match serde_json::to_value(data) {
        Ok(Value::Object(fields)) => {
            let header: Vec<String> = fields.keys().map(|k| escape(k)).collect();
            let values: Vec<String> = fields.values().map(|v| cell(Some(v))).collect();
            format!("{}\n{}", header.join(","), values.join(","))
        }
        Ok(other) => cell(Some(&other)),
        Err(_) => String::new(),
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => escape(s),
        Some(Value::Array(items)) => escape(
            &items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(";"),
        ),
        Some(other) => escape(&other.to_string()),
    }
}

fn escape(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Holder {
        player: &'static str,
        time: i64,
        value: f64,
        detail: Option<&'static str>,
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("player", "player"),
            Column::new("time", "time"),
            Column::new("value", "value"),
            Column::new("detail", "detail"),
        ]
    }

    #[test]
    fn test_rows_follow_column_order() {
        let rows = [
            Holder {
                player: "alice",
                time: 1_675_209_600,
                value: 900.0,
                detail: None,
            },
            Holder {
                player: "bob",
                time: 1_675_411_200,
                value: 850.5,
                detail: Some("tied"),
            },
        ];
        assert_eq!(
            rows_csv(&rows, &columns()),
            "player,time,value,detail\nalice,1675209600,900.0,\nbob,1675411200,850.5,tied"
        );
    }

    #[test]
    fn test_header_without_rows() {
        assert_eq!(rows_csv::<Holder>(&[], &columns()), "player,time,value,detail");
    }

    #[test]
    fn test_player_names_are_quoted() {
        let rows = [Holder {
            player: "o\"neil, jr",
            time: 0,
            value: 1.0,
            detail: Some("line\nbreak"),
        }];
        let csv = rows_csv(&rows, &columns());
        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "\"o\"\"neil, jr\",0,1.0,\"line"
        );
    }

    #[test]
    fn test_record_joins_lists() {
        #[derive(Serialize)]
        struct Tie {
            time: i64,
            players: Vec<&'static str>,
            name: Option<String>,
        }
        let tie = Tie {
            time: 30,
            players: vec!["carol", "dave"],
            name: None,
        };
        assert_eq!(record_csv(&tie), "time,players,name\n30,carol;dave,");
    }
}
