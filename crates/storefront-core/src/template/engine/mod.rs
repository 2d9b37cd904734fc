//! Template engine implementation

mod blocks;
mod expr;
mod helpers;
mod tokenize;

use crate::template::error::TemplateError;
use crate::template::filters::{FilterArgs, FilterRegistry};
use crate::template::value::{is_empty, is_truthy, to_number};
use serde_json::{Map, Value};

use blocks::{parse, ForLoop, Node};
use expr::{CompareOp, Condition, Expression, Operand};
use helpers::{compare, forloop_object, iterable_items, stringify_value, Scope};

/// Template context holding JSON data for rendering
#[derive(Debug, Clone)]
pub struct TemplateContext {
    data: Value,
}

impl TemplateContext {
    /// Create a new template context from a JSON value
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// Get the underlying JSON value
    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// Strictness switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Undefined variables raise `UndefinedKey` instead of rendering empty
    pub strict_variables: bool,
    /// Unknown filters raise `UnknownFilter` instead of passing the value through
    pub strict_filters: bool,
}

impl From<crate::config::RenderConfig> for RenderOptions {
    fn from(config: crate::config::RenderConfig) -> Self {
        Self {
            strict_variables: config.strict_variables,
            strict_filters: config.strict_filters,
        }
    }
}

/// Template engine rendering templates with JSON data
///
/// The filter registry is fixed when the engine is built.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    filters: FilterRegistry,
    options: RenderOptions,
}

impl TemplateEngine {
    /// Create a new template engine over the given filters
    pub fn new(filters: FilterRegistry) -> Self {
        Self {
            filters,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Render a template with the given context
    pub fn render(
        &self,
        template: &str,
        context: &TemplateContext,
    ) -> Result<String, TemplateError> {
        let nodes = parse(template)?;
        let mut scope = Scope::new(context.data());
        let mut output = String::with_capacity(template.len());
        self.render_nodes(&nodes, &mut scope, &mut output)?;
        Ok(output)
    }

    fn render_nodes(
        &self,
        nodes: &[Node],
        scope: &mut Scope,
        output: &mut String,
    ) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Output { expr, line } => {
                    let value = self.evaluate(expr, scope, *line)?;
                    output.push_str(&stringify_value(&value, &expr.source)?);
                }
                Node::If {
                    branches,
                    otherwise,
                    line,
                } => {
                    let mut taken = None;
                    for (condition, body) in branches {
                        if self.test(condition, scope, *line)? {
                            taken = Some(body);
                            break;
                        }
                    }
                    self.render_nodes(taken.unwrap_or(otherwise), scope, output)?;
                }
                Node::Unless {
                    condition,
                    body,
                    otherwise,
                    line,
                } => {
                    let branch = if self.test(condition, scope, *line)? {
                        otherwise
                    } else {
                        body
                    };
                    self.render_nodes(branch, scope, output)?;
                }
                Node::For(for_loop) => self.render_for(for_loop, scope, output)?,
                Node::Assign { name, expr, line } => {
                    let value = self.evaluate(expr, scope, *line)?;
                    scope.assign(name, value);
                }
            }
        }
        Ok(())
    }

    fn render_for(
        &self,
        for_loop: &ForLoop,
        scope: &mut Scope,
        output: &mut String,
    ) -> Result<(), TemplateError> {
        let subject = self.operand(&for_loop.subject, scope, for_loop.line)?;
        let mut items = iterable_items(&subject);

        let offset = self.count(for_loop.offset.as_ref(), scope, for_loop.line)?;
        let items_after_offset = items.len().saturating_sub(offset.unwrap_or(0));
        items = items.split_off(items.len() - items_after_offset);
        if let Some(limit) = self.count(for_loop.limit.as_ref(), scope, for_loop.line)? {
            items.truncate(limit);
        }
        if for_loop.reversed {
            items.reverse();
        }

        if items.is_empty() {
            return self.render_nodes(&for_loop.otherwise, scope, output);
        }

        let length = items.len();
        for (index, item) in items.into_iter().enumerate() {
            let mut frame = Map::new();
            frame.insert(for_loop.var.clone(), item);
            frame.insert("forloop".to_string(), forloop_object(index, length));
            scope.push_frame(frame);
            let result = self.render_nodes(&for_loop.body, scope, output);
            scope.pop_frame();
            result?;
        }
        Ok(())
    }

    /// Non-negative integer loop modifier
    fn count(
        &self,
        operand: Option<&Operand>,
        scope: &Scope,
        line: usize,
    ) -> Result<Option<usize>, TemplateError> {
        match operand {
            None => Ok(None),
            Some(operand) => {
                let n = to_number(&self.operand(operand, scope, line)?);
                Ok(Some(if n.is_finite() && n > 0.0 { n as usize } else { 0 }))
            }
        }
    }

    fn test(&self, condition: &Condition, scope: &Scope, line: usize) -> Result<bool, TemplateError> {
        Ok(match condition {
            Condition::Truthy(operand) => is_truthy(&self.operand(operand, scope, line)?),
            Condition::Compare { left, op, right } => match (left, right) {
                (Operand::Empty, other) | (other, Operand::Empty) => {
                    let value = self.operand(other, scope, line)?;
                    let equal = is_empty(&value);
                    match op {
                        CompareOp::Ne => !equal,
                        _ => equal,
                    }
                }
                _ => {
                    let left = self.operand(left, scope, line)?;
                    let right = self.operand(right, scope, line)?;
                    compare(&left, *op, &right)
                }
            },
            Condition::And(a, b) => self.test(a, scope, line)? && self.test(b, scope, line)?,
            Condition::Or(a, b) => self.test(a, scope, line)? || self.test(b, scope, line)?,
        })
    }

    fn operand(&self, operand: &Operand, scope: &Scope, line: usize) -> Result<Value, TemplateError> {
        match operand {
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Empty => Ok(Value::String(String::new())),
            Operand::Variable(path) => match scope.resolve(path) {
                Some(value) => Ok(value),
                None if self.options.strict_variables => Err(TemplateError::UndefinedKey {
                    key: path.source.clone(),
                    line,
                }),
                None => Ok(Value::Null),
            },
        }
    }

    /// Evaluate the base operand, then run it through the filter pipeline
    fn evaluate(&self, expr: &Expression, scope: &Scope, line: usize) -> Result<Value, TemplateError> {
        let mut value = self.operand(&expr.base, scope, line)?;

        for call in &expr.filters {
            let Some(filter) = self.filters.get(&call.name) else {
                if self.options.strict_filters {
                    return Err(TemplateError::UnknownFilter {
                        name: call.name.clone(),
                        line,
                    });
                }
                continue;
            };

            let args = FilterArgs {
                positional: call
                    .args
                    .iter()
                    .map(|arg| self.operand(arg, scope, line))
                    .collect::<Result<_, _>>()?,
                keyword: call
                    .kwargs
                    .iter()
                    .map(|(key, arg)| self.operand(arg, scope, line).map(|v| (key.clone(), v)))
                    .collect::<Result<_, _>>()?,
            };
            value = filter(&value, &args);
        }

        Ok(value)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(FilterRegistry::storefront())
    }
}

/// Convenience function to render a template with the storefront filters
pub fn render(template: &str, context: &TemplateContext) -> Result<String, TemplateError> {
    TemplateEngine::default().render(template, context)
}

#[cfg(test)]
mod tests;
