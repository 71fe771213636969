use super::{Fragment, Translator, Unsupported};
use crate::config::{AccessToken, FunctionToken, LiteralToken, OperatorToken, TokenName};
use crate::diagnostics::DiagnosticKind;
use crate::operators;
use transcoder_syntax::{CompareOperator, Constant, DictEntry, Expr, Keyword};

impl<'c> Translator<'c> {
    pub(super) fn render_expr(&mut self, expr: &Expr) -> Fragment {
        match expr {
            Expr::Call {
                func,
                args,
                keywords,
            } => self.render_call(func, args, keywords),
            Expr::Name(name) => Ok(name.clone()),
            Expr::Constant(constant) => Ok(self.render_constant(constant)),
            Expr::Attribute { value, attr } => {
                let config = self.config;
                let dot = self.require(&config.access, AccessToken::Attribute)?;
                let receiver = self.expr(value).into_text();
                Ok(format!("{}{}{}", receiver, dot, attr))
            }
            Expr::BinaryOp { left, op, right } => {
                let token = operators::binary_token(*op).ok_or_else(|| unknown_operator(op.tag()))?;
                let symbol = self.operator(token)?;
                let left = self.expr(left).into_text();
                let right = self.expr(right).into_text();
                Ok(format!("{}{}{}", left, symbol, right))
            }
            Expr::BooleanOp { op, values } => {
                let token =
                    operators::boolean_token(*op).ok_or_else(|| unknown_operator(op.tag()))?;
                let symbol = self.operator(token)?;
                let values: Vec<String> = values.iter().map(|v| self.expr(v).into_text()).collect();
                Ok(values.join(symbol))
            }
            Expr::Compare {
                left,
                ops,
                comparators,
            } => self.render_compare(left, ops, comparators),
            Expr::Subscript { value, index } => {
                let config = self.config;
                let open = self.require(&config.access, AccessToken::SubscriptOpen)?;
                let close = self.require(&config.access, AccessToken::SubscriptClose)?;
                let value = self.expr(value).into_text();
                let index = self.expr(index).into_text();
                Ok(format!("{}{}{}{}", value, open, index, close))
            }
            Expr::Dict(entries) => self.render_dict(entries),
            Expr::List(items) => self.render_sequence(
                items,
                LiteralToken::ListBegin,
                LiteralToken::ListJoin,
                LiteralToken::ListEnd,
            ),
            Expr::Tuple(items) => self.render_sequence(
                items,
                LiteralToken::TupleBegin,
                LiteralToken::TupleJoin,
                LiteralToken::TupleEnd,
            ),
            Expr::Other { kind } => Err(Unsupported::construct(kind)),
        }
    }

    fn operator(&self, token: OperatorToken) -> Result<&'c str, Unsupported> {
        let config = self.config;
        config.operator.get(token).ok_or_else(|| {
            Unsupported::new(
                DiagnosticKind::UnsupportedOperator,
                format!("operator {} is not configured", token.qualified()),
            )
        })
    }

    fn render_call(&mut self, func: &Expr, args: &[Expr], keywords: &[Keyword]) -> Fragment {
        let callee = self.expr(func).into_text();
        let args: Vec<String> = args.iter().map(|arg| self.expr(arg).into_text()).collect();
        let config = self.config;
        let args = self.join(args, &config.function, FunctionToken::ArgumentSeparator)?;

        if !keywords.is_empty() {
            let names: Vec<&str> = keywords
                .iter()
                .map(|k| k.arg.as_deref().unwrap_or("**"))
                .collect();
            self.diagnostics.warning(
                DiagnosticKind::UnsupportedConstruct,
                format!(
                    "keyword arguments dropped from call to {}: {}",
                    callee,
                    names.join(", ")
                ),
            );
        }

        Ok(format!("{}({})", callee, args))
    }

    fn render_compare(
        &mut self,
        left: &Expr,
        ops: &[CompareOperator],
        comparators: &[Expr],
    ) -> Fragment {
        let ([op], [right]) = (ops, comparators) else {
            return Err(Unsupported::new(
                DiagnosticKind::UnsupportedComparisonShape,
                format!(
                    "comparison with {} operators and {} comparators",
                    ops.len(),
                    comparators.len()
                ),
            ));
        };
        let token =
            operators::comparison_token(*op).ok_or_else(|| unknown_operator(op.tag()))?;
        let symbol = self.operator(token)?;
        let left = self.expr(left).into_text();
        let right = self.expr(right).into_text();
        Ok(format!("{}{}{}", left, symbol, right))
    }

    fn render_dict(&mut self, entries: &[DictEntry]) -> Fragment {
        let config = self.config;
        let begin = self.require(&config.literals, LiteralToken::DictBegin)?;
        let end = self.require(&config.literals, LiteralToken::DictEnd)?;

        let mut rendered = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(key) = &entry.key else {
                self.diagnostics.report(
                    DiagnosticKind::MalformedLiteral,
                    "dict entry without a key skipped",
                );
                continue;
            };
            let assign = self.require(&config.literals, LiteralToken::DictAssign)?;
            let key = self.expr(key).into_text();
            let value = self.expr(&entry.value).into_text();
            rendered.push(format!("{}{}{}", key, assign, value));
        }

        let body = self.join(rendered, &config.literals, LiteralToken::DictJoin)?;
        Ok(format!("{}{}{}", begin, body, end))
    }

    fn render_sequence(
        &mut self,
        items: &[Expr],
        begin: LiteralToken,
        join: LiteralToken,
        end: LiteralToken,
    ) -> Fragment {
        let config = self.config;
        let begin = self.require(&config.literals, begin)?;
        let end = self.require(&config.literals, end)?;
        let items: Vec<String> = items.iter().map(|item| self.expr(item).into_text()).collect();
        let body = self.join(items, &config.literals, join)?;
        Ok(format!("{}{}{}", begin, body, end))
    }

    /// Configured literal spellings win; otherwise constants keep their
    /// source spelling.
    fn render_constant(&self, constant: &Constant) -> String {
        let literals = &self.config.literals;
        let spelled = |token, fallback: &str| literals.get(token).unwrap_or(fallback).to_string();
        match constant {
            Constant::None => spelled(LiteralToken::NullLiteral, "None"),
            Constant::Bool(true) => spelled(LiteralToken::TrueLiteral, "True"),
            Constant::Bool(false) => spelled(LiteralToken::FalseLiteral, "False"),
            Constant::Int(value) => value.to_string(),
            Constant::Float(value) => float_literal(*value),
            Constant::Str(text) => match (
                literals.get(LiteralToken::StringBegin),
                literals.get(LiteralToken::StringEnd),
            ) {
                (Some(begin), Some(end)) => format!("{}{}{}", begin, text, end),
                _ => text.clone(),
            },
            Constant::Ellipsis => "Ellipsis".to_string(),
        }
    }
}

fn unknown_operator(tag: &str) -> Unsupported {
    Unsupported::new(
        DiagnosticKind::UnsupportedOperator,
        format!("no operator token for {}", tag),
    )
}

fn float_literal(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        return format!("{}inf", sign);
    }

    // Shortest round-trip digits; positional between 1e-4 and 1e16.
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..16).contains(&exponent) {
        let mut text = value.to_string();
        if !text.contains('.') {
            text.push_str(".0");
        }
        text
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_literal() {
        assert_eq!(float_literal(1.0), "1.0");
        assert_eq!(float_literal(-3.0), "-3.0");
        assert_eq!(float_literal(2.5), "2.5");
        assert_eq!(float_literal(-0.0), "-0.0");
        assert_eq!(float_literal(0.0001), "0.0001");
        assert_eq!(float_literal(1e15), "1000000000000000.0");
        assert_eq!(float_literal(1e16), "1e+16");
        assert_eq!(float_literal(1e-5), "1e-05");
        assert_eq!(float_literal(1.5e-7), "1.5e-07");
        assert_eq!(float_literal(2.5e300), "2.5e+300");
        assert_eq!(float_literal(f64::INFINITY), "inf");
        assert_eq!(float_literal(f64::NEG_INFINITY), "-inf");
        assert_eq!(float_literal(f64::NAN), "nan");
    }
}
