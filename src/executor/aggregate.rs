//! Hash-based grouping and aggregation executor.
//!
//! This module implements the group/aggregate operator:
//! - Any number of grouping expressions (none means one group)
//! - Aggregate functions COUNT, SUM, AVG, MIN, MAX
//! - NULL inputs are ignored by every aggregate except `count()`

use crate::access::relation::check_unique;
use crate::access::{Attribute, RelationValue, Tuple, Value};
use crate::error::{EvalError, EvalResult};
use crate::expression::eval::compare_values;
use crate::expression::resolver::local_name;
use crate::expression::{Environment, Expression, ExpressionEvaluator};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Supported aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    /// count() counts rows, count(expr) counts non-NULL values
    Count,
    /// sum(expr) - 0 over an empty group
    Sum,
    /// avg(expr) - truncating integer average, NULL over an empty group
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    /// Look up an aggregate by name, ignoring case
    pub fn from_name(name: &str) -> EvalResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "count" => Ok(AggregateFunction::Count),
            "sum" => Ok(AggregateFunction::Sum),
            "avg" => Ok(AggregateFunction::Avg),
            "min" => Ok(AggregateFunction::Min),
            "max" => Ok(AggregateFunction::Max),
            _ => Err(EvalError::UnknownFunction {
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
        }
    }
}

/// One aggregate column of the output
#[derive(Debug, Clone)]
pub struct AggregateSpec<'a> {
    pub function: AggregateFunction,
    /// None for count()
    pub argument: Option<&'a Expression>,
    pub name: String,
}

impl<'a> AggregateSpec<'a> {
    /// Interpret an aggregate expression such as `count(x) AS n`
    pub fn from_expression(expr: &'a Expression) -> EvalResult<Self> {
        let (func_name, args) = match expr.unnamed() {
            Expression::FunctionCall { name, args } => (name.as_str(), args),
            _ => {
                return Err(EvalError::UnknownFunction {
                    name: "non-aggregate expression".to_string(),
                })
            }
        };
        let function = AggregateFunction::from_name(func_name)?;

        let argument = match (function, args.as_slice()) {
            (AggregateFunction::Count, []) => None,
            (_, [arg]) => Some(arg),
            (_, args) => return Err(EvalError::arity(format!("call to {}", function.name()), 1, args.len())),
        };

        let name = match (expr, argument.map(Expression::unnamed)) {
            (Expression::Named { alias: Some(alias), .. }, _) => alias.clone(),
            (_, None) => format!("{}(*)", function.name()),
            (_, Some(Expression::Attribute(attr))) => {
                format!("{}({})", function.name(), local_name(attr))
            }
            _ => {
                return Err(EvalError::UnnamedAttribute {
                    context: format!("{} over an expression needs an alias", function.name()),
                })
            }
        };

        Ok(Self {
            function,
            argument,
            name,
        })
    }
}

/// Running state of one aggregate within one group
#[derive(Debug, Clone)]
struct AggregateState {
    function: AggregateFunction,
    /// Rows for count(), non-NULL values otherwise
    count: i64,
    sum: i64,
    /// Current MIN or MAX
    extreme: Option<Value>,
}

impl AggregateState {
    fn new(function: AggregateFunction) -> Self {
        Self {
            function,
            count: 0,
            sum: 0,
            extreme: None,
        }
    }

    /// Update the state with a new value
    fn update(&mut self, value: &Value) -> EvalResult<()> {
        if value.is_null() {
            return Ok(());
        }
        match self.function {
            AggregateFunction::Count => {}
            AggregateFunction::Sum | AggregateFunction::Avg => {
                let Value::Number(n) = value else {
                    return Err(EvalError::type_mismatch(
                        self.function.name(),
                        value.type_name(),
                        "-",
                    ));
                };
                self.sum = self
                    .sum
                    .checked_add(*n)
                    .ok_or_else(|| EvalError::NumericOverflow {
                        operator: self.function.name().to_string(),
                    })?;
            }
            AggregateFunction::Min | AggregateFunction::Max => {
                if matches!(value, Value::Boolean(_)) {
                    return Err(EvalError::type_mismatch(
                        self.function.name(),
                        value.type_name(),
                        "-",
                    ));
                }
                let wanted = if self.function == AggregateFunction::Min {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
                let replace = match &self.extreme {
                    None => true,
                    Some(current) => compare_values(self.function.name(), value, current)? == wanted,
                };
                if replace {
                    self.extreme = Some(value.clone());
                }
            }
        }
        self.count += 1;
        Ok(())
    }

    /// Count a row for count() without an argument
    fn update_row(&mut self) {
        self.count += 1;
    }

    /// Get the final aggregate value
    fn finalize(&self) -> Value {
        match self.function {
            AggregateFunction::Count => Value::Number(self.count),
            AggregateFunction::Sum => Value::Number(self.sum),
            AggregateFunction::Avg => {
                if self.count > 0 {
                    Value::Number(self.sum / self.count)
                } else {
                    Value::Null
                }
            }
            AggregateFunction::Min | AggregateFunction::Max => {
                self.extreme.clone().unwrap_or(Value::Null)
            }
        }
    }
}

/// Hash-based aggregation executor
pub struct HashAggregateExecutor<'a> {
    groups: &'a [Expression],
    aggregates: Vec<AggregateSpec<'a>>,
}

impl<'a> HashAggregateExecutor<'a> {
    pub fn new(groups: &'a [Expression], aggregates: &'a [Expression]) -> EvalResult<Self> {
        let aggregates = aggregates
            .iter()
            .map(AggregateSpec::from_expression)
            .collect::<EvalResult<Vec<_>>>()?;
        Ok(Self { groups, aggregates })
    }

    fn output_attributes(&self) -> EvalResult<Vec<Attribute>> {
        let mut attributes = Vec::with_capacity(self.groups.len() + self.aggregates.len());
        for group in self.groups {
            let name = group.output_name().ok_or_else(|| EvalError::UnnamedAttribute {
                context: "grouping expression has no name".to_string(),
            })?;
            attributes.push(Some(name.to_string()));
        }
        attributes.extend(self.aggregates.iter().map(|agg| Some(agg.name.clone())));
        check_unique(&attributes)?;
        Ok(attributes)
    }

    fn new_states(&self) -> Vec<AggregateState> {
        self.aggregates
            .iter()
            .map(|agg| AggregateState::new(agg.function))
            .collect()
    }

    pub fn execute(&self, input: &RelationValue) -> EvalResult<RelationValue> {
        let attributes = self.output_attributes()?;
        let mut partitions: HashMap<Tuple, Vec<AggregateState>> = HashMap::new();

        for row in input.rows() {
            let evaluator =
                ExpressionEvaluator::new(Environment::new(input.attribute_names(), row));

            let key = self
                .groups
                .iter()
                .map(|g| evaluator.evaluate(g))
                .collect::<EvalResult<Tuple>>()?;

            let states = partitions.entry(key).or_insert_with(|| self.new_states());
            for (state, agg) in states.iter_mut().zip(&self.aggregates) {
                match agg.argument {
                    Some(arg) => state.update(&evaluator.evaluate(arg)?)?,
                    None => state.update_row(),
                }
            }
        }

        // Without grouping the whole input is one partition, even when empty
        if partitions.is_empty() && self.groups.is_empty() {
            partitions.insert(Vec::new(), self.new_states());
        }

        let rows: BTreeSet<Tuple> = partitions
            .into_iter()
            .map(|(mut key, states)| {
                key.extend(states.iter().map(AggregateState::finalize));
                key
            })
            .collect();

        Ok(RelationValue::from_parts(attributes, rows))
    }
}
