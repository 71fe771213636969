use super::{Fragment, Translator, Unsupported};
use crate::config::{AssignmentToken, FlowToken, FunctionToken, TokenName};
use crate::diagnostics::DiagnosticKind;
use transcoder_syntax::{Expr, FunctionDef, Stmt};

/// Token set of one block construct (`if`, `while`, `foreach`).
struct BlockTokens {
    key: FlowToken,
    begin: FlowToken,
    end: FlowToken,
    open_body: FlowToken,
    close_body: FlowToken,
}

const IF_TOKENS: BlockTokens = BlockTokens {
    key: FlowToken::IfKey,
    begin: FlowToken::IfBegin,
    end: FlowToken::IfEnd,
    open_body: FlowToken::IfOpenBody,
    close_body: FlowToken::IfCloseBody,
};

const WHILE_TOKENS: BlockTokens = BlockTokens {
    key: FlowToken::WhileKey,
    begin: FlowToken::WhileBegin,
    end: FlowToken::WhileEnd,
    open_body: FlowToken::WhileOpenBody,
    close_body: FlowToken::WhileCloseBody,
};

const FOREACH_TOKENS: BlockTokens = BlockTokens {
    key: FlowToken::ForeachKey,
    begin: FlowToken::ForeachBegin,
    end: FlowToken::ForeachEnd,
    open_body: FlowToken::ForeachOpenBody,
    close_body: FlowToken::ForeachCloseBody,
};

impl<'c> Translator<'c> {
    pub(super) fn render_stmt(&mut self, stmt: &Stmt) -> Fragment {
        match stmt {
            Stmt::Assign { targets, value } => self.render_assign(targets, value),
            // rendered directly so a failing expression is reported once
            Stmt::Expr(expr) => self.render_expr(expr),
            Stmt::Return(value) => {
                let key = self.return_key()?;
                match value {
                    Some(value) => Ok(format!("{}{}", key, self.expr(value).text())),
                    None => Ok(key.to_string()),
                }
            }
            Stmt::FunctionDef(def) => self.render_function(def),
            Stmt::ForEach {
                target,
                iter,
                body,
                orelse,
            } => {
                let config = self.config;
                let separator = self.require(&config.flow, FlowToken::ForeachSeparator)?;
                self.drop_else("for", orelse);
                let target = self.expr(target).into_text();
                let iter = self.expr(iter).into_text();
                let head = format!("{}{}{}", target, separator, iter);
                self.render_block(&FOREACH_TOKENS, head, body)
            }
            Stmt::If { test, body, orelse } => {
                self.drop_else("if", orelse);
                let test = self.expr(test).into_text();
                self.render_block(&IF_TOKENS, test, body)
            }
            Stmt::While { test, body, orelse } => {
                self.drop_else("while", orelse);
                let test = self.expr(test).into_text();
                self.render_block(&WHILE_TOKENS, test, body)
            }
            Stmt::Other { kind } => Err(Unsupported::construct(kind)),
        }
    }

    pub(super) fn render_function(&mut self, def: &FunctionDef) -> Fragment {
        let config = self.config;
        let define = self.require(&config.function, FunctionToken::DefineKey)?;
        let open = self.require(&config.function, FunctionToken::OpenBody)?;
        let close = self.require(&config.function, FunctionToken::CloseBody)?;
        let params = self.join(
            def.params.clone(),
            &config.function,
            FunctionToken::ArgumentSeparator,
        )?;
        let body = self.body(&def.body);
        Ok(format!(
            "{}{}({}){}{}{}",
            define, def.name, params, open, body, close
        ))
    }

    fn render_assign(&mut self, targets: &[Expr], value: &Expr) -> Fragment {
        let config = self.config;
        let assign = self.require(&config.assignment, AssignmentToken::AssignKey)?;
        let rendered: Vec<String> = targets.iter().map(|t| self.expr(t).into_text()).collect();
        let mut group = self.join(
            rendered,
            &config.assignment,
            AssignmentToken::MultipleAssignJoin,
        )?;

        let wrap = config.assignment.is_set(AssignmentToken::MultipleAssignBegin)
            && config.assignment.is_set(AssignmentToken::MultipleAssignEnd);
        if wrap {
            let begin = self.require(&config.assignment, AssignmentToken::MultipleAssignBegin)?;
            let end = self.require(&config.assignment, AssignmentToken::MultipleAssignEnd)?;
            group = format!("{}{}{}", begin, group, end);
        }

        let value = self.expr(value).into_text();
        Ok(format!("{}{}{}", group, assign, value))
    }

    /// `key begin head end open_body`, the body, then `close_body`.
    fn render_block(&mut self, tokens: &BlockTokens, head: String, body: &[Stmt]) -> Fragment {
        let config = self.config;
        let flow = &config.flow;
        let key = self.require(flow, tokens.key)?;
        let begin = self.require(flow, tokens.begin)?;
        let end = self.require(flow, tokens.end)?;
        let open = self.require(flow, tokens.open_body)?;
        let close = self.require(flow, tokens.close_body)?;
        let body = self.body(body);
        Ok(format!(
            "{}{}{}{}{}{}{}",
            key, begin, head, end, open, body, close
        ))
    }

    /// `function.return_key`, falling back to `flow.return_key`.
    fn return_key(&self) -> Result<&'c str, Unsupported> {
        let config = self.config;
        config
            .function
            .get(FunctionToken::ReturnKey)
            .or_else(|| config.flow.get(FlowToken::ReturnKey))
            .ok_or_else(|| {
                Unsupported::new(
                    DiagnosticKind::MissingToken,
                    format!(
                        "token {} is not configured (nor {})",
                        FunctionToken::ReturnKey.qualified(),
                        FlowToken::ReturnKey.qualified()
                    ),
                )
            })
    }

    /// Only single-branch blocks translate; `else`/`elif` are dropped.
    fn drop_else(&mut self, construct: &str, orelse: &[Stmt]) {
        if !orelse.is_empty() {
            self.diagnostics.warning(
                DiagnosticKind::UnsupportedConstruct,
                format!(
                    "else branch of {} dropped ({} statements)",
                    construct,
                    orelse.len()
                ),
            );
        }
    }
}
