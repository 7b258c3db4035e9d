//! Sample data for running the server without a database (`--demo`)

use crate::db::memory::MemoryGateway;
use serde_json::json;

pub fn demo_gateway() -> MemoryGateway {
    MemoryGateway::new()
        .with_table(
            "dictionarydata",
            vec![
                json!({"TableName": "YearlyStatsBatting", "FieldNameX": "Season", "Verify": 1, "Order": 1}),
                json!({"TableName": "YearlyStatsBatting", "FieldNameX": "G", "Verify": 1, "Order": 2}),
                json!({"TableName": "YearlyStatsBatting", "FieldNameX": "AVG", "Verify": 1, "Order": 3}),
                json!({"TableName": "YearlyStatsBatting", "FieldNameX": "HR", "Verify": 1, "Order": 4}),
                json!({"TableName": "YearlyStatsBatting", "FieldNameX": "RBI", "Verify": 1, "Order": 5}),
                json!({"TableName": "YearlyStatsBatting", "FieldNameX": "OBP", "Verify": 0, "Order": 6}),
            ],
        )
        .with_table(
            "players",
            vec![
                json!({"PlayerRefID": 1001, "Name": "Ray Alvarez", "TeamID": 1, "Position1": "SS", "Deleted": 0}),
                json!({"PlayerRefID": 1002, "Name": "Tom Becker", "TeamID": 2, "Position1": "CF", "Deleted": 0}),
                json!({"PlayerRefID": 1003, "Name": "Luis Cano", "TeamID": 3, "Position1": "1B", "Deleted": 0}),
                json!({"PlayerRefID": 1004, "Name": "Sam Doyle", "TeamID": 2, "Position1": "C", "Deleted": 0}),
                json!({"PlayerRefID": 1005, "Name": "Ken Endo", "TeamID": 1, "Position1": "SP", "Deleted": 0}),
                json!({"PlayerRefID": 1006, "Name": "Ari Flores", "TeamID": 3, "Position1": "LF", "Deleted": 1}),
            ],
        )
        .with_table(
            "yearlystatsbatting",
            vec![
                json!({"PlayerRefID": 1001, "Season": 2024, "G": 141, "AVG": 0.281, "HR": 19, "RBI": 77, "OBP": 0.344}),
                json!({"PlayerRefID": 1002, "Season": 2024, "G": 150, "AVG": 0.262, "HR": 27, "RBI": 84, "OBP": 0.331}),
                json!({"PlayerRefID": 1003, "Season": 2024, "G": 98, "AVG": 0.305, "HR": 11, "RBI": 52, "OBP": 0.372}),
            ],
        )
        .with_table("injuries", vec![json!({"PlayerRefID": 1001, "Injury": "hamstring"})])
        .with_table(
            "todaysstarters",
            vec![json!({"PlayerRefID1": 1001}), json!({"PlayerRefID1": 1002})],
        )
        .with_table("todaysgames", vec![json!({"TeamID": 1}), json!({"TeamID": 2})])
}
