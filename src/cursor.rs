//! Cursor: bind table, statement execution and buffered fetching.
//!
//! A `Cursor` owns the bind variables of the statements it executes and the
//! fetch position of the current result set. It drives a `Transport` with a
//! plain request/response cycle: wire-encoded binds go out, OUT values and raw
//! rows come back.

use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::config::CursorConfig;
use crate::error::{Error, Result};
use crate::params::{BindValue, Params};
use crate::protocol::types::{
    BindDirection, ColumnDescriptor, ColumnInfo, DescriptionTuple, InputSize, OracleValue,
    Row, RowCodec, TypeBinder, TypeCode, Var, VarValue, Variable,
};
use crate::transport::{BindKey, BindParam, Transport};

/// Variable attached to a placeholder.
#[derive(Debug, Clone)]
struct BindEntry {
    key: BindKey,
    var: Var,
    /// Created by the cursor rather than passed in by the caller.
    implicit: bool,
}

impl BindEntry {
    fn to_param(&self) -> BindParam {
        let var = self.var.borrow();
        BindParam {
            key: self.key.clone(),
            type_code: var.type_code(),
            max_length: var.max_length(),
            is_array: var.is_array(),
            num_elements: var.num_elements(),
            direction: var.direction(),
            values: var.wire_values().to_vec(),
        }
    }
}

/// Input size hint waiting for the next execute.
#[derive(Debug, Clone)]
struct PendingSize {
    key: BindKey,
    hint: InputSize,
    /// Variable created for type and size hints.
    var: Option<Var>,
}

/// Bind table being built by one execute.
///
/// Changes to variables already bound are staged on copies and only applied
/// by `commit`.
struct PendingBinds {
    entries: Vec<BindEntry>,
    writes: Vec<(Var, Variable)>,
}

impl PendingBinds {
    fn new(entries: Vec<BindEntry>) -> Self {
        Self {
            entries,
            writes: Vec::new(),
        }
    }

    /// Contents of `var` including staged writes.
    fn current(&self, var: &Var) -> Variable {
        match self.writes.iter().find(|(staged, _)| staged.ptr_eq(var)) {
            Some((_, variable)) => variable.clone(),
            None => var.borrow().clone(),
        }
    }

    fn write(&mut self, var: Var, variable: Variable) {
        match self.writes.iter_mut().find(|(staged, _)| staged.ptr_eq(&var)) {
            Some(staged) => staged.1 = variable,
            None => self.writes.push((var, variable)),
        }
    }

    fn put(&mut self, key: BindKey, var: Var, implicit: bool) {
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => {
                entry.var = var;
                entry.implicit = implicit;
            }
            None => {
                self.entries.push(BindEntry { key, var, implicit });
                self.entries.sort_by_key(|entry| match entry.key {
                    BindKey::Position(pos) => pos,
                    BindKey::Name(_) => 0,
                });
            }
        }
    }

    fn bind_value(
        &mut self,
        binder: &TypeBinder,
        key: BindKey,
        value: VarValue,
        hint: Option<InputSize>,
        declared: bool,
    ) -> Result<()> {
        let existing = self
            .entries
            .iter()
            .find(|entry| entry.key == key && entry.implicit)
            .map(|entry| entry.var.clone());

        if let Some(var) = existing.filter(|_| hint.is_none()) {
            let mut variable = self.current(&var);
            if declared {
                variable.set_value(0, value)?;
                variable.set_direction(BindDirection::InOut);
                self.write(var, variable);
                return Ok(());
            }
            if accepts(&variable, &value) {
                match variable.set_value(0, value.clone()) {
                    Ok(()) => {
                        trace!(key = %key, "reusing bind variable");
                        self.write(var, variable);
                        return Ok(());
                    }
                    Err(
                        Error::TypeMismatch { .. }
                        | Error::ValueTooLong { .. }
                        | Error::IndexOutOfRange { .. },
                    ) => {}
                    Err(e) => return Err(e),
                }
            }
        }

        let var = Var::new(binder.bind(&value, hint)?);
        trace!(key = %key, var = ?var, "bound new variable");
        self.put(key, var, true);
        Ok(())
    }

    fn commit(self) -> Vec<BindEntry> {
        for (var, variable) in self.writes {
            var.replace(variable);
        }
        self.entries
    }
}

/// Statement cursor over a transport.
///
/// # Example
///
/// ```ignore
/// use oracle_thin_vars::{Cursor, Params, TypeCode};
///
/// let mut cursor = Cursor::new(&mut transport);
///
/// let retval = cursor.var(TypeCode::String, Some(30));
/// cursor.execute(
///     "begin :retval := pkg_TestStringArrays.TestInArrays(:start, :array); end;",
///     Params::new()
///         .bind("retval", &retval)
///         .bind("start", 5i64)
///         .bind("array", vec!["String 1".into(), "String 2".into()]),
/// )?;
///
/// cursor.execute("select * from TestStrings order by IntCol", Params::new())?;
/// while let Some(row) = cursor.fetch_one()? {
///     println!("{:?}", row.get_by_name("StringCol"));
/// }
/// ```
pub struct Cursor<T: Transport> {
    /// Transport collaborator.
    transport: T,
    /// Cursor settings.
    config: CursorConfig,
    /// Builds variables for plain values.
    binder: TypeBinder,
    /// Decodes describe metadata and fetched rows.
    codec: RowCodec,
    /// Bind table, persisted across executions.
    binds: Vec<BindEntry>,
    /// Hints consumed by the next execute.
    input_sizes: Vec<PendingSize>,
    /// Columns of the current result set (empty when not a query).
    column_info: Arc<ColumnInfo>,
    /// Raw rows not yet handed out, decoded on the way out.
    buffer: VecDeque<Vec<Option<Bytes>>>,
    /// Whether the transport has more rows.
    more_rows: bool,
    /// Total rows received from the transport.
    rows_fetched: u64,
    /// Rows handed out for a query, rows affected otherwise.
    rowcount: u64,
}

impl<T: Transport> Cursor<T> {
    /// Create a cursor with default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, CursorConfig::default())
    }

    /// Create a cursor with the given configuration.
    pub fn with_config(transport: T, config: CursorConfig) -> Self {
        Self {
            transport,
            binder: TypeBinder::new(config.max_string_size),
            codec: RowCodec::new(config.number_policy),
            config,
            binds: Vec::new(),
            input_sizes: Vec::new(),
            column_info: Arc::new(ColumnInfo::default()),
            buffer: VecDeque::new(),
            more_rows: false,
            rows_fetched: 0,
            rowcount: 0,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Rows requested per transport fetch.
    pub fn arraysize(&self) -> u32 {
        self.config.arraysize
    }

    /// Set rows requested per transport fetch. Zero is treated as one.
    pub fn set_arraysize(&mut self, arraysize: u32) {
        self.config.arraysize = arraysize.max(1);
    }

    /// Get the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get the transport mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the cursor, returning the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Create a scalar variable. Without a size the type's default is used.
    pub fn var(&self, type_code: TypeCode, size: Option<u32>) -> Var {
        let size = size.unwrap_or_else(|| type_code.default_max_length());
        Var::new(Variable::new(type_code, size))
    }

    /// Create an array variable of `num_elements` elements.
    pub fn arrayvar(&self, type_code: TypeCode, num_elements: usize, size: Option<u32>) -> Var {
        let size = size.unwrap_or_else(|| type_code.default_max_length());
        Var::new(Variable::new_array(type_code, size, num_elements))
    }

    /// Declare the types of parameters for the next execute.
    ///
    /// Type and size hints create their variable immediately and return it.
    /// Array hints are applied when the array value arrives. Replaces any
    /// hints not yet consumed.
    pub fn set_input_sizes<K: Into<BindKey>>(
        &mut self,
        sizes: impl IntoIterator<Item = (K, InputSize)>,
    ) -> Vec<(BindKey, Var)> {
        self.input_sizes.clear();
        let mut created = Vec::new();

        for (key, hint) in sizes {
            let key = key.into();
            let var = self.binder.variable_for(hint).map(Var::new);
            if let Some(var) = &var {
                created.push((key.clone(), var.clone()));
            }
            trace!(key = %key, ?hint, "input size declared");
            self.input_sizes.push(PendingSize { key, hint, var });
        }

        created
    }

    /// Execute a statement.
    ///
    /// Binds persist: a placeholder omitted from `params` keeps its previous
    /// variable. A plain value reuses the cursor's variable for that
    /// placeholder when the type matches and the value fits, otherwise a new
    /// variable is built. Returns the rows affected reported by the transport.
    ///
    /// The previous result set is discarded first. If binding fails, the bind
    /// table, pending input sizes and every variable are left as they were.
    pub fn execute(&mut self, sql: &str, params: Params) -> Result<u64> {
        self.reset_fetch_state();

        let mut pending = PendingBinds::new(self.binds.clone());
        let named = params
            .is_named()?
            .or_else(|| self.input_sizes.first().map(|p| p.key.is_named()));
        if let Some(named) = named {
            if pending.entries.iter().any(|entry| entry.key.is_named() != named) {
                debug!("bind style changed, clearing bind table");
                pending.entries.clear();
            }
        }

        let mut declared = Vec::new();
        let mut array_hints = Vec::new();
        for size in &self.input_sizes {
            match &size.var {
                Some(var) => {
                    let mut variable = pending.current(var);
                    variable.set_direction(BindDirection::Out);
                    pending.write(var.clone(), variable);
                    pending.put(size.key.clone(), var.clone(), true);
                    declared.push(size.key.clone());
                }
                None => array_hints.push((size.key.clone(), size.hint)),
            }
        }

        for (key, value) in params.into_entries() {
            match value {
                BindValue::Var(var) => pending.put(key, var, false),
                BindValue::Value(value) => {
                    let hint = array_hints
                        .iter()
                        .find(|(k, _)| *k == key)
                        .map(|(_, hint)| *hint);
                    let is_declared = declared.contains(&key);
                    pending.bind_value(&self.binder, key, value, hint, is_declared)?;
                }
            }
        }

        self.input_sizes.clear();
        self.binds = pending.commit();

        let mut wire: Vec<BindParam> = self.binds.iter().map(BindEntry::to_param).collect();
        debug!(sql, binds = wire.len(), "executing statement");
        let response = self.transport.execute(sql, &mut wire)?;

        let outputs: Vec<(&BindEntry, Vec<Option<Bytes>>)> = self
            .binds
            .iter()
            .zip(wire)
            .filter(|(entry, _)| entry.var.direction().receives_output())
            .map(|(entry, param)| (entry, param.values))
            .collect();
        for (entry, values) in &outputs {
            entry.var.borrow().check_output(values)?;
        }
        for (entry, values) in outputs {
            trace!(key = %entry.key, elements = values.len(), "copying output values");
            entry.var.borrow_mut().store_output(values)?;
        }

        let metadata = self.transport.describe_columns()?;
        if metadata.is_empty() {
            self.rowcount = response.rows_affected;
        } else {
            let columns = self.codec.describe(&metadata)?;
            debug!(columns = columns.len(), "statement returned a result set");
            self.column_info = Arc::new(ColumnInfo::new(columns));
            self.more_rows = true;
        }

        Ok(response.rows_affected)
    }

    /// Get the variable bound to a placeholder.
    pub fn bind_var(&self, key: impl Into<BindKey>) -> Option<Var> {
        let key = key.into();
        self.binds
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.var.clone())
    }

    /// Decode the current value of the variable bound to a placeholder.
    ///
    /// Returns `Err(Error::BindNotFound)` if nothing is bound there.
    pub fn bind_value_of(&self, key: impl Into<BindKey>) -> Result<VarValue> {
        let key = key.into();
        match self.bind_var(key.clone()) {
            Some(var) => var.get_value(),
            None => Err(Error::BindNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// Placeholders currently bound, in bind order.
    pub fn bind_names(&self) -> Vec<BindKey> {
        self.binds.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Column descriptors of the current result set (empty when not a query).
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.column_info.columns
    }

    /// Description tuples of the current result set, `None` when not a query.
    pub fn description(&self) -> Option<Vec<DescriptionTuple>> {
        if self.column_info.is_empty() {
            return None;
        }
        Some(self.column_info.columns.iter().map(ColumnDescriptor::to_tuple).collect())
    }

    /// Rows fetched so far for a query, or rows affected by the last DML.
    pub fn rowcount(&self) -> u64 {
        self.rowcount
    }

    /// Rows received from the transport for the current result set, including
    /// rows still buffered.
    pub fn rows_fetched(&self) -> u64 {
        self.rows_fetched
    }

    /// Check if more rows are available (buffered or from the transport).
    pub fn has_more(&self) -> bool {
        !self.buffer.is_empty() || self.more_rows
    }

    /// Get the next row, or `None` once the result set is exhausted.
    ///
    /// A row that fails to decode is consumed by the error; the following
    /// call returns the next row.
    pub fn fetch_one(&mut self) -> Result<Option<Row>> {
        if self.buffer.is_empty() {
            if !self.more_rows {
                return Ok(None);
            }
            self.do_fetch()?;
        }

        let Some(raw) = self.buffer.pop_front() else {
            return Ok(None);
        };
        let row = self.codec.decode_row(&raw, &self.column_info)?;
        self.rowcount += 1;
        Ok(Some(row))
    }

    /// Get up to `num_rows` rows. Returns an empty vector once exhausted.
    pub fn fetch_many(&mut self, num_rows: usize) -> Result<Vec<Row>> {
        let mut rows = Vec::with_capacity(num_rows.min(self.config.arraysize as usize));
        while rows.len() < num_rows {
            match self.fetch_one()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(rows)
    }

    /// Get up to `arraysize` rows.
    pub fn fetch_batch(&mut self) -> Result<Vec<Row>> {
        self.fetch_many(self.config.arraysize as usize)
    }

    /// Get all remaining rows.
    pub fn fetch_all(&mut self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch_one()? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Iterate over the remaining rows.
    ///
    /// Stops after the first error.
    pub fn rows(&mut self) -> impl Iterator<Item = Result<Row>> + '_ {
        let mut failed = false;
        std::iter::from_fn(move || {
            if failed {
                return None;
            }
            let next = self.fetch_one().transpose();
            failed = matches!(next, Some(Err(_)));
            next
        })
    }

    fn reset_fetch_state(&mut self) {
        self.column_info = Arc::new(ColumnInfo::default());
        self.buffer.clear();
        self.more_rows = false;
        self.rows_fetched = 0;
        self.rowcount = 0;
    }

    fn do_fetch(&mut self) -> Result<()> {
        let response = self.transport.fetch_raw(self.config.arraysize)?;
        debug!(
            rows = response.rows.len(),
            more_rows = response.more_rows,
            "fetched rows"
        );

        let fetched = response.rows.len();
        self.buffer.extend(response.rows);

        self.rows_fetched += fetched as u64;
        self.more_rows = response.more_rows && fetched > 0;
        Ok(())
    }
}

/// Whether a cursor-owned variable can take `value` without changing type.
fn accepts(var: &Variable, value: &VarValue) -> bool {
    if var.is_deferred() {
        return false;
    }
    let inferred = match value {
        VarValue::Scalar(value) if !var.is_array() => value.inferred_type(),
        VarValue::Array(values) if var.is_array() => {
            values.iter().find_map(OracleValue::inferred_type)
        }
        _ => return false,
    };
    match inferred {
        None => true,
        Some(TypeCode::String) => var.type_code().is_character(),
        Some(type_code) => type_code == var.type_code(),
    }
}
