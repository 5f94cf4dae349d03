//! Converts loaded columns to the representation of their declared type.
//!
//! | Declared            | Column dtype |
//! |---------------------|--------------|
//! | `string`, `object`  | `String`     |
//! | `integer`           | `Int64`      |
//! | `date`              | `Date`       |
//! | `boolean`           | `Boolean`    |

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use memsynth_model::LogicalType;
use polars::prelude::{AnyValue, Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};

use crate::cell::{cell_text, is_null};
use crate::error::LoadError;
use crate::expectation::Expectation;

/// `NaiveDate::from_ymd(1970, 1, 1).num_days_from_ce()`.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Coerces every table column that has an expectation.
///
/// Columns absent from the table are skipped; reconciliation has already
/// decided whether that is acceptable.
pub fn coerce_types(
    df: &mut DataFrame,
    expectations: &BTreeMap<String, Expectation>,
) -> Result<(), LoadError> {
    for (name, expectation) in expectations {
        let Ok(column) = df.column(name) else {
            continue;
        };
        let converted = coerce_column(column, expectation)?;
        df.with_column(converted)?;
    }
    Ok(())
}

/// Returns `column` converted to the type declared by `expectation`.
pub fn coerce_column(column: &Column, expectation: &Expectation) -> Result<Column, LoadError> {
    let target = expectation.data_type();
    let dtype = column.dtype();
    tracing::debug!(column = %column.name(), %target, from = %dtype, "Coercing column");

    let converted = match target {
        LogicalType::String | LogicalType::Object => column.cast(&DataType::String)?,
        // Nulls and NaN stay null whatever the nullability; `check` reports them.
        LogicalType::Integer if dtype.is_integer() => column.strict_cast(&DataType::Int64)?,
        LogicalType::Integer => rebuild(column, elementwise(column, target, parse_integer)?),
        LogicalType::Date => match dtype {
            DataType::Date => column.clone(),
            DataType::Datetime(..) => column.cast(&DataType::Date)?,
            _ => rebuild(column, elementwise(column, target, parse_date)?)
                .cast(&DataType::Date)?,
        },
        LogicalType::Boolean => match dtype {
            DataType::Boolean => column.clone(),
            _ => rebuild(column, elementwise(column, target, parse_boolean)?),
        },
    };
    Ok(converted)
}

/// Converts each non-null cell through `parse`, keeping nulls as nulls.
fn elementwise<T>(
    column: &Column,
    target: LogicalType,
    parse: fn(&AnyValue<'_>, &str) -> Option<T>,
) -> Result<Vec<Option<T>>, LoadError> {
    let mut values = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if is_null(&value) {
            values.push(None);
            continue;
        }
        let text = cell_text(value.clone()).unwrap_or_default();
        if text.trim().is_empty() {
            values.push(None);
            continue;
        }
        match parse(&value, text.trim()) {
            Some(parsed) => values.push(Some(parsed)),
            None => {
                return Err(LoadError::Coercion {
                    column: column.name().to_string(),
                    row: idx,
                    value: text,
                    target,
                });
            }
        }
    }
    Ok(values)
}

fn rebuild<T>(column: &Column, values: Vec<Option<T>>) -> Column
where
    Series: NamedFrom<Vec<Option<T>>, [Option<T>]>,
{
    Series::new(column.name().clone(), values).into_column()
}

fn parse_integer(value: &AnyValue<'_>, text: &str) -> Option<i64> {
    match value {
        AnyValue::Boolean(b) => Some(i64::from(*b)),
        AnyValue::Float32(v) => integral(f64::from(*v)),
        AnyValue::Float64(v) => integral(*v),
        _ => text
            .parse::<i64>()
            .ok()
            .or_else(|| text.parse::<f64>().ok().and_then(integral)),
    }
}

fn integral(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.2e18 {
        Some(v as i64)
    } else {
        None
    }
}

/// Days since the Unix epoch, the physical representation of `Date`.
fn parse_date(_value: &AnyValue<'_>, text: &str) -> Option<i32> {
    let date = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|datetime| datetime.date())
        })?;
    Some(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
}

fn parse_boolean(value: &AnyValue<'_>, text: &str) -> Option<bool> {
    if let AnyValue::Boolean(b) = value {
        return Some(*b);
    }
    match text.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
