//! In-memory transport emulating the string-variable test schema.
//!
//! Understands a fixed set of statements against `TestStrings`,
//! `TestTempTable` and the `pkg_TestStringArrays` package.

#![allow(dead_code)]

use bytes::Bytes;
use std::collections::VecDeque;

use oracle_thin_vars::protocol::constants::{
    ORA_TYPE_NUM_CHAR, ORA_TYPE_NUM_NUMBER, ORA_TYPE_NUM_RAW, ORA_TYPE_NUM_ROWID,
    ORA_TYPE_NUM_VARCHAR,
};
use oracle_thin_vars::protocol::decode::encode_oracle_number;
use oracle_thin_vars::{
    BindKey, BindParam, ColumnMetadata, Error, ExecuteResponse, FetchResponse, NumberPolicy,
    OracleValue, Result, Transport,
};

/// Number of rows in `TestStrings`.
pub const TEST_STRINGS_ROWS: i64 = 10;

type RawRow = Vec<Option<Bytes>>;

/// Expected decoded row of `TestStrings` for `IntCol = i`.
pub fn test_strings_row(i: i64) -> Vec<OracleValue> {
    vec![
        OracleValue::Integer(i),
        OracleValue::from(format!("String {}", i)),
        OracleValue::Raw(format!("Raw {}", i).into_bytes()),
        OracleValue::from(format!("{:<40}", format!("Fixed Char {}", i))),
        if i % 2 == 1 {
            OracleValue::from(format!("Nullable {}", i))
        } else {
            OracleValue::Null
        },
    ]
}

/// All rows of `TestStrings` ordered by `IntCol`.
pub fn test_strings_rows() -> Vec<Vec<OracleValue>> {
    (1..=TEST_STRINGS_ROWS).map(test_strings_row).collect()
}

/// Row identifier of the `TestStrings` row with `IntCol = i`.
pub fn rowid_of(i: i64) -> String {
    format!("AAAR3sAAEAAAACXAA{}", (b'A' + i as u8) as char)
}

fn number(i: i64) -> Option<Bytes> {
    encode_oracle_number(&i.to_string())
        .ok()
        .flatten()
        .map(Bytes::from)
}

fn text(s: impl Into<String>) -> Option<Bytes> {
    Some(Bytes::from(s.into()))
}

fn test_strings_columns() -> Vec<ColumnMetadata> {
    vec![
        ColumnMetadata::new("INTCOL", ORA_TYPE_NUM_NUMBER)
            .with_size(22, 0)
            .with_precision(9, 0)
            .with_nullable(false),
        ColumnMetadata::new("STRINGCOL", ORA_TYPE_NUM_VARCHAR)
            .with_size(80, 20)
            .with_nullable(false),
        ColumnMetadata::new("RAWCOL", ORA_TYPE_NUM_RAW)
            .with_size(30, 0)
            .with_nullable(false),
        ColumnMetadata::new("FIXEDCHARCOL", ORA_TYPE_NUM_CHAR)
            .with_size(160, 40)
            .with_nullable(false),
        ColumnMetadata::new("NULLABLECOL", ORA_TYPE_NUM_VARCHAR).with_size(200, 50),
    ]
}

fn raw_test_strings_row(i: i64) -> RawRow {
    vec![
        number(i),
        text(format!("String {}", i)),
        text(format!("Raw {}", i)),
        text(format!("{:<40}", format!("Fixed Char {}", i))),
        if i % 2 == 1 {
            text(format!("Nullable {}", i))
        } else {
            None
        },
    ]
}

/// Scripted transport over an in-memory copy of the test schema.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    /// Every executed statement with the binds it received.
    pub executed: Vec<(String, Vec<BindParam>)>,
    /// Row counts requested by each fetch.
    pub fetch_sizes: Vec<u32>,
    temp_table: Vec<(i64, String)>,
    columns: Vec<ColumnMetadata>,
    pending: VecDeque<RawRow>,
}

impl ScriptedTransport {
    /// Create a transport with an empty temp table.
    pub fn new() -> Self {
        Self::default()
    }

    fn set_result(&mut self, columns: Vec<ColumnMetadata>, rows: Vec<RawRow>) {
        self.columns = columns;
        self.pending = rows.into();
    }

    fn run(&mut self, sql: &str, binds: &mut [BindParam]) -> Result<u64> {
        let normalized = sql.split_whitespace().collect::<Vec<_>>().join(" ");
        let lower = normalized.to_lowercase();

        if lower.contains("pkg_teststringarrays.testinarrays") {
            let start = input(binds, "integerValue")?
                .to_i64()
                .ok_or_else(|| Error::transport("integerValue is not an integer"))?;
            let total: i64 = strings(binds, "array")?
                .iter()
                .map(|s| s.chars().count() as i64)
                .sum();
            write(binds, "returnValue", vec![number(start + total)])?;
        } else if lower.contains("pkg_teststringarrays.testinoutarrays") {
            let count = num_elems(binds)?;
            let mut values = bind(binds, "array")?.values.clone();
            for (i, value) in values.iter_mut().enumerate().take(count) {
                let len = value.as_ref().map_or(0, |v| v.len());
                *value = text(format!(
                    "Converted element # {} originally had length {}",
                    i + 1,
                    len
                ));
            }
            write(binds, "array", values)?;
        } else if lower.contains("pkg_teststringarrays.testoutarrays") {
            let count = num_elems(binds)?;
            let values = (1..=count)
                .map(|i| text(format!("Test out element # {}", i)))
                .collect();
            write(binds, "array", values)?;
        } else if lower.starts_with("declare t_temp varchar2(20000)") {
            let value = input(binds, "bigString")?;
            let len = value.as_str().map_or(0, str::len);
            if len > 20000 {
                return Err(Error::transport("ORA-06502: character string buffer too small"));
            }
        } else if lower.starts_with("begin :") {
            assign(&normalized, binds)?;
        } else if lower == "select rowid from teststrings where intcol = 3" {
            let columns = vec![ColumnMetadata::new("ROWID", ORA_TYPE_NUM_ROWID).with_size(18, 0)];
            self.set_result(columns, vec![vec![text(rowid_of(3))]]);
        } else if lower.starts_with("select * from teststrings") {
            let ids = select_test_strings(&lower, binds)?;
            let rows = ids.into_iter().map(raw_test_strings_row).collect();
            self.set_result(test_strings_columns(), rows);
        } else if lower == "truncate table testtemptable" {
            self.temp_table.clear();
        } else if lower == "insert into testtemptable values (:1, :2)" {
            let id = input(binds, 1usize)?
                .to_i64()
                .ok_or_else(|| Error::transport("first value is not an integer"))?;
            let value = input(binds, 2usize)?;
            self.temp_table
                .push((id, value.as_str().unwrap_or_default().to_string()));
            return Ok(1);
        } else if lower == "select stringcol from testtemptable" {
            let columns =
                vec![ColumnMetadata::new("STRINGCOL", ORA_TYPE_NUM_VARCHAR).with_size(4000, 1000)];
            let rows = self.temp_table.iter().map(|(_, s)| vec![text(s.clone())]).collect();
            self.set_result(columns, rows);
        } else {
            return Err(Error::transport(format!("unsupported statement: {}", normalized)));
        }

        Ok(0)
    }
}

impl Transport for ScriptedTransport {
    fn execute(&mut self, sql: &str, binds: &mut [BindParam]) -> Result<ExecuteResponse> {
        self.columns.clear();
        self.pending.clear();
        let rows_affected = self.run(sql, binds)?;
        self.executed.push((sql.to_string(), binds.to_vec()));
        Ok(ExecuteResponse { rows_affected })
    }

    fn fetch_raw(&mut self, max_rows: u32) -> Result<FetchResponse> {
        self.fetch_sizes.push(max_rows);
        let n = (max_rows as usize).min(self.pending.len());
        let rows = self.pending.drain(..n).collect();
        Ok(FetchResponse {
            rows,
            more_rows: !self.pending.is_empty(),
        })
    }

    fn describe_columns(&self) -> Result<Vec<ColumnMetadata>> {
        Ok(self.columns.clone())
    }
}

fn bind(binds: &mut [BindParam], key: impl Into<BindKey>) -> Result<&mut BindParam> {
    let key = key.into();
    binds
        .iter_mut()
        .find(|b| b.key == key)
        .ok_or_else(|| Error::transport(format!("ORA-01008: not all variables bound ({})", key)))
}

fn input(binds: &mut [BindParam], key: impl Into<BindKey>) -> Result<OracleValue> {
    let param = bind(binds, key)?;
    OracleValue::from_wire(
        param.type_code,
        param.values.first().and_then(|v| v.as_deref()),
        NumberPolicy::Text,
    )
}

fn strings(binds: &mut [BindParam], key: &str) -> Result<Vec<String>> {
    let param = bind(binds, key)?;
    param
        .values
        .iter()
        .flatten()
        .map(|v| {
            String::from_utf8(v.to_vec()).map_err(|e| Error::transport(e.to_string()))
        })
        .collect()
}

fn num_elems(binds: &mut [BindParam]) -> Result<usize> {
    input(binds, "numElems")?
        .to_i64()
        .map(|n| n as usize)
        .ok_or_else(|| Error::transport("numElems is not an integer"))
}

fn write(binds: &mut [BindParam], key: &str, values: Vec<Option<Bytes>>) -> Result<()> {
    let param = bind(binds, key)?;
    if !param.direction.receives_output() {
        return Err(Error::transport(format!("{} is not an output bind", param.key)));
    }
    param.values = values;
    Ok(())
}

/// `begin :target := 'literal'; end;` or `begin :target := :source || 'literal'; end;`
fn assign(statement: &str, binds: &mut [BindParam]) -> Result<()> {
    let body = statement
        .trim_start_matches("begin")
        .trim_start_matches("BEGIN")
        .trim()
        .trim_end_matches("end;")
        .trim_end_matches("END;")
        .trim()
        .trim_end_matches(';');
    let (target, expr) = body
        .split_once(":=")
        .ok_or_else(|| Error::transport("unsupported block"))?;
    let target = target.trim();
    let expr = expr.trim();

    let (prefix, literal) = match expr.split_once("||") {
        Some((source, literal)) => {
            let source = input(binds, source.trim())?;
            (source.as_str().unwrap_or_default().to_string(), literal.trim())
        }
        None => (String::new(), expr),
    };
    let literal = literal.trim_matches('\'');
    write(binds, target, vec![text(format!("{}{}", prefix, literal))])
}

fn select_test_strings(lower: &str, binds: &mut [BindParam]) -> Result<Vec<i64>> {
    let all = 1..=TEST_STRINGS_ROWS;
    let ids = if lower.contains("where stringcol = :value") {
        let value = input(binds, "value")?;
        all.filter(|i| value.as_str() == Some(format!("String {}", i).as_str()))
            .collect()
    } else if lower.contains("where rawcol = :value") {
        let value = input(binds, "value")?;
        all.filter(|i| value.as_raw() == Some(format!("Raw {}", i).as_bytes()))
            .collect()
    } else if lower.contains("where rowid = :value") {
        let value = input(binds, "value")?;
        all.filter(|i| value.as_str() == Some(rowid_of(*i).as_str()))
            .collect()
    } else if lower.contains("where intcol in (3, 4)") {
        vec![3, 4]
    } else {
        all.collect()
    };
    Ok(ids)
}
