//! Tree-sitter based Python reader.
//!
//! Node kinds that the IR has no shape for are kept as `Other` nodes named
//! after the source language's own syntax tree (`Lambda`, `ClassDef`,
//! `UnaryOp`...), so downstream diagnostics read the way a Python developer
//! would expect.

use crate::ir::*;
use crate::member::ModuleMember;
use crate::traits::{ReadError, Reader};
use tree_sitter::{Node, Parser, Tree};

/// Static instance of the Python reader for registry.
pub static PYTHON_READER: PythonReader = PythonReader;

/// Python reader using tree-sitter.
pub struct PythonReader;

impl Reader for PythonReader {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn read(&self, source: &str) -> Result<Module, ReadError> {
        read_python(source)
    }

    fn members(&self, source: &str) -> Result<Vec<ModuleMember>, ReadError> {
        read_python_members(source)
    }
}

/// Parse Python source into the syntax IR.
pub fn read_python(source: &str) -> Result<Module, ReadError> {
    let tree = parse(source)?;
    let ctx = ReadContext::new(source);
    ctx.read_module(&tree)
}

/// Parse the isolated source of one Python function.
pub fn read_python_function(source: &str) -> Result<FunctionDef, ReadError> {
    PYTHON_READER.read_function(source)
}

/// List the top-level members of a Python module.
pub fn read_python_members(source: &str) -> Result<Vec<ModuleMember>, ReadError> {
    let tree = parse(source)?;
    let ctx = ReadContext::new(source);
    ctx.read_members(&tree)
}

fn parse(source: &str) -> Result<Tree, ReadError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_python::language().into())
        .map_err(|err| ReadError::Parse(err.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ReadError::Parse("failed to parse".into()))?;

    if tree.root_node().has_error() {
        return Err(ReadError::Parse("syntax error in source".into()));
    }
    Ok(tree)
}

struct ReadContext<'a> {
    source: &'a str,
}

impl<'a> ReadContext<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn field<'t>(&self, node: Node<'t>, name: &str) -> Result<Node<'t>, ReadError> {
        node.child_by_field_name(name)
            .ok_or_else(|| ReadError::Parse(format!("{} missing {}", node.kind(), name)))
    }

    fn read_module(&self, tree: &Tree) -> Result<Module, ReadError> {
        Ok(Module::new(self.read_block_stmts(tree.root_node())?))
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn read_members(&self, tree: &Tree) -> Result<Vec<ModuleMember>, ReadError> {
        let root = tree.root_node();
        let mut members = Vec::new();
        let mut cursor = root.walk();

        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "function_definition" => {
                    let name = self.field(child, "name")?;
                    members.push(ModuleMember::callable(
                        self.node_text(name),
                        self.node_text(child),
                    ));
                }

                // The decorators stay part of the callable's own source.
                "decorated_definition" => {
                    let def = self.field(child, "definition")?;
                    let name = self.node_text(self.field(def, "name")?);
                    if def.kind() == "function_definition" {
                        members.push(ModuleMember::callable(name, self.node_text(child)));
                    } else {
                        members.push(ModuleMember::other(name, "class"));
                    }
                }

                "class_definition" => {
                    let name = self.field(child, "name")?;
                    members.push(ModuleMember::other(self.node_text(name), "class"));
                }

                "import_statement" => self.read_import_members(child, &mut members),

                "import_from_statement" => self.read_import_from_members(child, &mut members)?,

                "assignment" => self.read_assignment_member(child, &mut members),

                "expression_statement" => {
                    if let Some(assign) = child.named_child(0) {
                        if assign.kind() == "assignment" {
                            self.read_assignment_member(assign, &mut members);
                        }
                    }
                }

                _ => {}
            }
        }

        Ok(members)
    }

    /// Only plain `NAME = ...` bindings are members.
    fn read_assignment_member(&self, node: Node, members: &mut Vec<ModuleMember>) {
        if let Some(left) = node.child_by_field_name("left") {
            if left.kind() == "identifier" {
                members.push(ModuleMember::other(self.node_text(left), "assignment"));
            }
        }
    }

    /// `import a.b` binds `a`; `import a.b as c` binds `c` to `a.b`.
    fn read_import_members(&self, node: Node, members: &mut Vec<ModuleMember>) {
        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            match name.kind() {
                "aliased_import" => {
                    if let (Some(path), Some(alias)) = (
                        name.child_by_field_name("name"),
                        name.child_by_field_name("alias"),
                    ) {
                        members.push(ModuleMember::submodule(
                            self.node_text(alias),
                            self.node_text(path),
                        ));
                    }
                }
                _ => {
                    let path = self.node_text(name);
                    let root = path.split('.').next().unwrap_or(path);
                    members.push(ModuleMember::submodule(root, root));
                }
            }
        }
    }

    /// Only `from . import x` is known to bind a module; other from-imports
    /// may bind anything and are reported as plain imports.
    fn read_import_from_members(
        &self,
        node: Node,
        members: &mut Vec<ModuleMember>,
    ) -> Result<(), ReadError> {
        let module_name = self.field(node, "module_name")?;
        let relative_package = self.node_text(module_name).chars().all(|c| c == '.');

        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            let (bound, path) = match name.kind() {
                "aliased_import" => {
                    let path = self.field(name, "name")?;
                    let alias = self.field(name, "alias")?;
                    (self.node_text(alias), self.node_text(path))
                }
                _ => (self.node_text(name), self.node_text(name)),
            };
            if relative_package {
                members.push(ModuleMember::submodule(bound, path));
            } else {
                members.push(ModuleMember::other(bound, "import"));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn read_block_stmts(&self, node: Node) -> Result<Vec<Stmt>, ReadError> {
        let mut stmts = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            if let Some(stmt) = self.read_stmt(child)? {
                stmts.push(stmt);
            }
        }

        Ok(stmts)
    }

    fn read_stmt(&self, node: Node) -> Result<Option<Stmt>, ReadError> {
        let stmt = match node.kind() {
            "comment" => return Ok(None),

            "expression_statement" => self.read_expression_statement(node)?,

            "assignment" => self.read_assignment(node)?,
            "augmented_assignment" => Stmt::other("AugAssign"),
            "yield" => Stmt::expr(Expr::other("Yield")),

            // Expression nodes at statement level
            kind if is_expression_kind(kind) => Stmt::expr(self.read_expr(node)?),

            "return_statement" => {
                let value = node
                    .named_child(0)
                    .map(|value| self.read_expr(value))
                    .transpose()?;
                Stmt::return_stmt(value)
            }

            "function_definition" => self.read_function_definition(node)?,

            "decorated_definition" => {
                let def = self.field(node, "definition")?;
                return self.read_stmt(def);
            }

            "for_statement" => self.read_for_statement(node)?,
            "if_statement" => self.read_if_statement(node)?,
            "while_statement" => self.read_while_statement(node)?,

            "class_definition" => Stmt::other("ClassDef"),
            "try_statement" => Stmt::other("Try"),
            "with_statement" => Stmt::other("With"),
            "import_statement" => Stmt::other("Import"),
            "import_from_statement" | "future_import_statement" => Stmt::other("ImportFrom"),
            "pass_statement" => Stmt::other("Pass"),
            "break_statement" => Stmt::other("Break"),
            "continue_statement" => Stmt::other("Continue"),
            "raise_statement" => Stmt::other("Raise"),
            "assert_statement" => Stmt::other("Assert"),
            "delete_statement" => Stmt::other("Delete"),
            "global_statement" => Stmt::other("Global"),
            "nonlocal_statement" => Stmt::other("Nonlocal"),
            "match_statement" => Stmt::other("Match"),

            other => Stmt::other(other),
        };
        Ok(Some(stmt))
    }

    fn read_expression_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        let mut cursor = node.walk();
        let children: Vec<_> = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .collect();

        match children.as_slice() {
            [single] => match single.kind() {
                "assignment" => self.read_assignment(*single),
                "augmented_assignment" => Ok(Stmt::other("AugAssign")),
                "yield" => Ok(Stmt::expr(Expr::other("Yield"))),
                _ => Ok(Stmt::expr(self.read_expr(*single)?)),
            },
            // `a, b` as a statement is a bare tuple
            _ => Ok(Stmt::expr(Expr::tuple(self.read_exprs(&children)?))),
        }
    }

    /// `a = b = value` is one assignment with two targets.
    fn read_assignment(&self, node: Node) -> Result<Stmt, ReadError> {
        if node.child_by_field_name("type").is_some() {
            return Ok(Stmt::other("AnnAssign"));
        }

        let mut targets = vec![self.read_expr(self.field(node, "left")?)?];
        let mut value = match node.child_by_field_name("right") {
            Some(right) => right,
            None => return Ok(Stmt::other("AnnAssign")),
        };

        while value.kind() == "assignment" {
            targets.push(self.read_expr(self.field(value, "left")?)?);
            value = self.field(value, "right")?;
        }

        let value = match value.kind() {
            "yield" => Expr::other("Yield"),
            _ => self.read_expr(value)?,
        };
        Ok(Stmt::assign(targets, value))
    }

    fn read_function_definition(&self, node: Node) -> Result<Stmt, ReadError> {
        if self.starts_with_async(node) {
            return Ok(Stmt::other("AsyncFunctionDef"));
        }

        let name = self.field(node, "name")?;
        let body = self.field(node, "body")?;
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.read_parameters(p))
            .unwrap_or_default();

        Ok(Stmt::function(FunctionDef::new(
            self.node_text(name),
            params,
            self.read_block_stmts(body)?,
        )))
    }

    /// Positional parameter names. Anything after `*`, `*args` or `**kwargs`
    /// is not positional and is left out.
    fn read_parameters(&self, node: Node) -> Vec<String> {
        let mut params = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "identifier" => params.push(self.node_text(child).to_string()),
                "default_parameter" | "typed_default_parameter" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        params.push(self.node_text(name).to_string());
                    }
                }
                "typed_parameter" => {
                    // The name is the first child; the type hangs off a field.
                    match child.named_child(0) {
                        Some(name) if name.kind() == "identifier" => {
                            params.push(self.node_text(name).to_string());
                        }
                        _ => break,
                    }
                }
                "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => {
                    break;
                }
                _ => {}
            }
        }

        params
    }

    fn read_for_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        if self.starts_with_async(node) {
            return Ok(Stmt::other("AsyncFor"));
        }

        let target = self.read_expr(self.field(node, "left")?)?;
        let iter = self.read_expr(self.field(node, "right")?)?;
        let body = self.read_block_stmts(self.field(node, "body")?)?;
        let orelse = self.read_else_clause(node)?;

        Ok(Stmt::ForEach {
            target,
            iter,
            body,
            orelse,
        })
    }

    fn read_while_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        let test = self.read_expr(self.field(node, "condition")?)?;
        let body = self.read_block_stmts(self.field(node, "body")?)?;
        let orelse = self.read_else_clause(node)?;

        Ok(Stmt::While { test, body, orelse })
    }

    fn read_else_clause(&self, node: Node) -> Result<Vec<Stmt>, ReadError> {
        match node.child_by_field_name("alternative") {
            Some(alt) => self.read_block_stmts(self.field(alt, "body")?),
            None => Ok(Vec::new()),
        }
    }

    fn read_if_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        let test = self.read_expr(self.field(node, "condition")?)?;
        let body = self.read_block_stmts(self.field(node, "consequence")?)?;

        let mut cursor = node.walk();
        let alternatives: Vec<_> = node
            .children_by_field_name("alternative", &mut cursor)
            .collect();
        let orelse = self.read_alternatives(&alternatives)?;

        Ok(Stmt::If { test, body, orelse })
    }

    /// `elif` clauses nest as an `If` inside the previous branch's `orelse`.
    fn read_alternatives(&self, alternatives: &[Node]) -> Result<Vec<Stmt>, ReadError> {
        let Some((first, rest)) = alternatives.split_first() else {
            return Ok(Vec::new());
        };

        match first.kind() {
            "elif_clause" => {
                let test = self.read_expr(self.field(*first, "condition")?)?;
                let body = self.read_block_stmts(self.field(*first, "consequence")?)?;
                let orelse = self.read_alternatives(rest)?;
                Ok(vec![Stmt::If { test, body, orelse }])
            }
            _ => self.read_block_stmts(self.field(*first, "body")?),
        }
    }

    fn starts_with_async(&self, node: Node) -> bool {
        node.child(0).is_some_and(|first| first.kind() == "async")
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn read_exprs(&self, nodes: &[Node]) -> Result<Vec<Expr>, ReadError> {
        nodes.iter().map(|node| self.read_expr(*node)).collect()
    }

    fn read_named_children(&self, node: Node) -> Result<Vec<Expr>, ReadError> {
        let mut cursor = node.walk();
        let children: Vec<_> = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .collect();
        self.read_exprs(&children)
    }

    fn read_expr(&self, node: Node) -> Result<Expr, ReadError> {
        match node.kind() {
            "identifier" => Ok(Expr::name(self.node_text(node))),

            "integer" => Ok(self.read_integer(node)),
            "float" => Ok(self.read_float(node)),
            "string" => Ok(self
                .read_string(node)
                .map(Expr::string)
                .unwrap_or_else(|| Expr::other("JoinedStr"))),
            "concatenated_string" => self.read_concatenated_string(node),
            "true" => Ok(Expr::bool(true)),
            "false" => Ok(Expr::bool(false)),
            "none" => Ok(Expr::none()),
            "ellipsis" => Ok(Expr::Constant(Constant::Ellipsis)),

            "call" => self.read_call(node),
            "attribute" => {
                let value = self.read_expr(self.field(node, "object")?)?;
                let attr = self.node_text(self.field(node, "attribute")?);
                Ok(Expr::attribute(value, attr))
            }
            "subscript" => self.read_subscript(node),

            "binary_operator" => self.read_binary_operator(node),
            "boolean_operator" => self.read_boolean_operator(node),
            "comparison_operator" => self.read_comparison_operator(node),
            "not_operator" | "unary_operator" => Ok(Expr::other("UnaryOp")),

            "list" | "list_pattern" => Ok(Expr::list(self.read_named_children(node)?)),
            "tuple" | "tuple_pattern" | "expression_list" | "pattern_list" => {
                Ok(Expr::tuple(self.read_named_children(node)?))
            }
            "dictionary" => self.read_dictionary(node),

            "parenthesized_expression" => {
                let mut cursor = node.walk();
                let inner = node
                    .named_children(&mut cursor)
                    .find(|c| c.kind() != "comment")
                    .ok_or_else(|| {
                        ReadError::Parse("parenthesized_expression missing inner".into())
                    })?;
                match inner.kind() {
                    "yield" => Ok(Expr::other("Yield")),
                    _ => self.read_expr(inner),
                }
            }

            "lambda" => Ok(Expr::other("Lambda")),
            "conditional_expression" => Ok(Expr::other("IfExp")),
            "named_expression" => Ok(Expr::other("NamedExpr")),
            "await" => Ok(Expr::other("Await")),
            "list_comprehension" => Ok(Expr::other("ListComp")),
            "dictionary_comprehension" => Ok(Expr::other("DictComp")),
            "set_comprehension" => Ok(Expr::other("SetComp")),
            "generator_expression" => Ok(Expr::other("GeneratorExp")),
            "set" => Ok(Expr::other("Set")),
            "slice" => Ok(Expr::other("Slice")),
            "list_splat" | "list_splat_pattern" => Ok(Expr::other("Starred")),

            other => Ok(Expr::other(other)),
        }
    }

    fn read_integer(&self, node: Node) -> Expr {
        let text = self.node_text(node).replace('_', "");
        let lower = text.to_ascii_lowercase();
        let parsed = if let Some(hex) = lower.strip_prefix("0x") {
            i64::from_str_radix(hex, 16).ok()
        } else if let Some(oct) = lower.strip_prefix("0o") {
            i64::from_str_radix(oct, 8).ok()
        } else if let Some(bin) = lower.strip_prefix("0b") {
            i64::from_str_radix(bin, 2).ok()
        } else {
            lower.parse().ok()
        };
        match parsed {
            Some(value) => Expr::int(value),
            // Imaginary literals and integers wider than 64 bits
            None => Expr::other("integer"),
        }
    }

    fn read_float(&self, node: Node) -> Expr {
        let text = self.node_text(node).replace('_', "");
        match text.parse() {
            Ok(value) => Expr::float(value),
            Err(_) => Expr::other("float"),
        }
    }

    /// Content of a string literal, or `None` for f-strings with
    /// interpolations.
    fn read_string(&self, node: Node) -> Option<String> {
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();

        if children.iter().any(|c| c.kind() == "interpolation") {
            return None;
        }

        let start = children.iter().find(|c| c.kind() == "string_start");
        let end = children.iter().rev().find(|c| c.kind() == "string_end");

        let (raw, prefix) = match (start, end) {
            (Some(start), Some(end)) => (
                &self.source[start.end_byte()..end.start_byte()],
                self.node_text(*start),
            ),
            _ => {
                let text = self.node_text(node);
                let inner = text
                    .trim_start_matches(|c: char| c.is_ascii_alphabetic())
                    .trim_matches(|c| c == '"' || c == '\'');
                (inner, text)
            }
        };

        let is_raw = prefix
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .any(|c| c == 'r' || c == 'R');

        Some(if is_raw {
            raw.to_string()
        } else {
            unescape(raw)
        })
    }

    fn read_concatenated_string(&self, node: Node) -> Result<Expr, ReadError> {
        let mut cursor = node.walk();
        let mut joined = String::new();
        for part in node.named_children(&mut cursor) {
            if part.kind() != "string" {
                continue;
            }
            match self.read_string(part) {
                Some(content) => joined.push_str(&content),
                None => return Ok(Expr::other("JoinedStr")),
            }
        }
        Ok(Expr::string(joined))
    }

    fn read_call(&self, node: Node) -> Result<Expr, ReadError> {
        let func = self.read_expr(self.field(node, "function")?)?;
        let mut args = Vec::new();
        let mut keywords = Vec::new();

        if let Some(arguments) = node.child_by_field_name("arguments") {
            if arguments.kind() == "generator_expression" {
                args.push(Expr::other("GeneratorExp"));
            } else {
                let mut cursor = arguments.walk();
                for child in arguments.named_children(&mut cursor) {
                    match child.kind() {
                        "comment" => {}
                        "keyword_argument" => {
                            let name = self.field(child, "name")?;
                            let value = self.field(child, "value")?;
                            keywords.push(Keyword {
                                arg: Some(self.node_text(name).to_string()),
                                value: self.read_expr(value)?,
                            });
                        }
                        "dictionary_splat" => {
                            let value = child.named_child(0).ok_or_else(|| {
                                ReadError::Parse("dictionary_splat missing value".into())
                            })?;
                            keywords.push(Keyword {
                                arg: None,
                                value: self.read_expr(value)?,
                            });
                        }
                        _ => args.push(self.read_expr(child)?),
                    }
                }
            }
        }

        Ok(Expr::Call {
            func: Box::new(func),
            args,
            keywords,
        })
    }

    /// `a[i, j]` indexes with the tuple `(i, j)`.
    fn read_subscript(&self, node: Node) -> Result<Expr, ReadError> {
        let value = self.read_expr(self.field(node, "value")?)?;

        let mut cursor = node.walk();
        let indices: Vec<_> = node
            .children_by_field_name("subscript", &mut cursor)
            .collect();

        let index = match indices.as_slice() {
            [] => return Err(ReadError::Parse("subscript missing subscript".into())),
            [single] => self.read_expr(*single)?,
            many => Expr::tuple(self.read_exprs(many)?),
        };

        Ok(Expr::subscript(value, index))
    }

    fn read_binary_operator(&self, node: Node) -> Result<Expr, ReadError> {
        let left = self.field(node, "left")?;
        let right = self.field(node, "right")?;
        let op_node = self.field(node, "operator")?;

        let op = BinaryOperator::from_symbol(self.node_text(op_node)).ok_or_else(|| {
            ReadError::Unsupported(format!("binary operator {}", self.node_text(op_node)))
        })?;

        Ok(Expr::binary(self.read_expr(left)?, op, self.read_expr(right)?))
    }

    /// Runs of the same boolean operator collapse into one node, as long as
    /// no parentheses separate them.
    fn read_boolean_operator(&self, node: Node) -> Result<Expr, ReadError> {
        let left = self.field(node, "left")?;
        let right = self.field(node, "right")?;
        let op_node = self.field(node, "operator")?;

        let op = BooleanOperator::from_symbol(self.node_text(op_node)).ok_or_else(|| {
            ReadError::Unsupported(format!("boolean operator {}", self.node_text(op_node)))
        })?;

        let mut values = match self.read_expr(left)? {
            Expr::BooleanOp {
                op: left_op,
                values,
            } if left_op == op && left.kind() == "boolean_operator" => values,
            other => vec![other],
        };
        values.push(self.read_expr(right)?);

        Ok(Expr::boolean(op, values))
    }

    /// Named children are operands, anonymous ones are the operators
    /// (`not in` and `is not` arrive as single aliased tokens).
    fn read_comparison_operator(&self, node: Node) -> Result<Expr, ReadError> {
        let mut cursor = node.walk();
        let mut operands = Vec::new();
        let mut ops = Vec::new();

        for child in node.children(&mut cursor) {
            if child.is_named() {
                if child.kind() != "comment" {
                    operands.push(self.read_expr(child)?);
                }
                continue;
            }
            let symbol = child.kind();
            let op = CompareOperator::from_symbol(symbol).ok_or_else(|| {
                ReadError::Unsupported(format!("comparison operator {}", symbol))
            })?;
            ops.push(op);
        }

        let mut operands = operands.into_iter();
        let left = operands
            .next()
            .ok_or_else(|| ReadError::Parse("comparison_operator missing left".into()))?;
        let comparators: Vec<_> = operands.collect();

        if comparators.len() != ops.len() {
            return Err(ReadError::Parse(
                "comparison_operator operands and operators do not pair up".into(),
            ));
        }

        Ok(Expr::Compare {
            left: Box::new(left),
            ops,
            comparators,
        })
    }

    fn read_dictionary(&self, node: Node) -> Result<Expr, ReadError> {
        let mut entries = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "pair" => {
                    let key = self.read_expr(self.field(child, "key")?)?;
                    let value = self.read_expr(self.field(child, "value")?)?;
                    entries.push(DictEntry {
                        key: Some(key),
                        value,
                    });
                }
                "dictionary_splat" => {
                    let value = child.named_child(0).ok_or_else(|| {
                        ReadError::Parse("dictionary_splat missing value".into())
                    })?;
                    entries.push(DictEntry {
                        key: None,
                        value: self.read_expr(value)?,
                    });
                }
                _ => {}
            }
        }

        Ok(Expr::Dict(entries))
    }
}

fn is_expression_kind(kind: &str) -> bool {
    matches!(
        kind,
        "identifier"
            | "integer"
            | "float"
            | "string"
            | "concatenated_string"
            | "true"
            | "false"
            | "none"
            | "ellipsis"
            | "call"
            | "attribute"
            | "subscript"
            | "binary_operator"
            | "boolean_operator"
            | "comparison_operator"
            | "not_operator"
            | "unary_operator"
            | "list"
            | "tuple"
            | "expression_list"
            | "dictionary"
            | "parenthesized_expression"
            | "lambda"
            | "conditional_expression"
            | "named_expression"
            | "await"
            | "list_comprehension"
            | "dictionary_comprehension"
            | "set_comprehension"
            | "generator_expression"
            | "set"
            | "list_splat"
    )
}

/// Resolve the backslash escapes of a non-raw string literal. Unknown and
/// malformed escapes (including `\N{...}`) are kept as written.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push('\\');
            break;
        };
        match escape {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            '\\' | '\'' | '"' => out.push(escape),
            '\n' => {}
            '0'..='7' => {
                let mut value = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
            }
            'x' | 'u' | 'U' => {
                let width = match escape {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().take(width).collect();
                let hex = digits.len() == width && digits.chars().all(|d| d.is_ascii_hexdigit());
                let decoded = hex
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => {
                        out.push(ch);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    None => {
                        out.push('\\');
                        out.push(escape);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_assignment() {
        let ir = read_python("x = 42").unwrap();
        assert_eq!(
            ir.body,
            vec![Stmt::assign(vec![Expr::name("x")], Expr::int(42))]
        );
    }

    #[test]
    fn test_chained_assignment_has_two_targets() {
        let ir = read_python("a = b = 1").unwrap();
        assert_eq!(
            ir.body,
            vec![Stmt::assign(
                vec![Expr::name("a"), Expr::name("b")],
                Expr::int(1)
            )]
        );
    }

    #[test]
    fn test_tuple_unpacking_is_one_target() {
        let ir = read_python("a, b = 1, 2").unwrap();
        assert_eq!(
            ir.body,
            vec![Stmt::assign(
                vec![Expr::tuple(vec![Expr::name("a"), Expr::name("b")])],
                Expr::tuple(vec![Expr::int(1), Expr::int(2)])
            )]
        );
    }

    #[test]
    fn test_function_call_keeps_keywords_apart() {
        let ir = read_python("print(\"hello\", 42, sep=\"-\")").unwrap();
        match &ir.body[0] {
            Stmt::Expr(Expr::Call {
                func,
                args,
                keywords,
            }) => {
                assert_eq!(func.as_ref(), &Expr::name("print"));
                assert_eq!(args, &vec![Expr::string("hello"), Expr::int(42)]);
                assert_eq!(keywords.len(), 1);
                assert_eq!(keywords[0].arg.as_deref(), Some("sep"));
            }
            other => panic!("expected Call, got {:?}", other),
        }
    }

    #[test]
    fn test_function_definition() {
        let def = read_python_function("def add(a, b=1, *rest, c):\n    return a + b\n").unwrap();
        assert_eq!(def.name, "add");
        assert_eq!(def.params, vec!["a", "b"]);
        assert_eq!(
            def.body,
            vec![Stmt::return_stmt(Some(Expr::binary(
                Expr::name("a"),
                BinaryOperator::Add,
                Expr::name("b")
            )))]
        );
    }

    #[test]
    fn test_decorated_function_reads_inner_definition() {
        let def = read_python_function("@cache\ndef f():\n    return 1\n").unwrap();
        assert_eq!(def.name, "f");
    }

    #[test]
    fn test_read_function_rejects_non_function() {
        assert!(matches!(
            read_python_function("x = 1\n"),
            Err(ReadError::UnexpectedNode { .. })
        ));
        assert!(matches!(
            read_python_function("def f():\n    pass\nx = 1\n"),
            Err(ReadError::UnexpectedNode { .. })
        ));
        assert!(matches!(
            read_python_function("def f(:\n"),
            Err(ReadError::Parse(_))
        ));
    }

    #[test]
    fn test_docstring_is_expression_statement() {
        let def = read_python_function("def f():\n    \"doc\"\n    return 1\n").unwrap();
        assert_eq!(def.body[0], Stmt::expr(Expr::string("doc")));
    }

    #[test]
    fn test_chained_comparison_keeps_all_operators() {
        let ir = read_python("a < b < c").unwrap();
        match &ir.body[0] {
            Stmt::Expr(Expr::Compare {
                ops, comparators, ..
            }) => {
                assert_eq!(ops, &vec![CompareOperator::Lt, CompareOperator::Lt]);
                assert_eq!(comparators.len(), 2);
            }
            other => panic!("expected Compare, got {:?}", other),
        }
    }

    #[test]
    fn test_not_in_and_is_not() {
        let ir = read_python("a not in b\nc is not None").unwrap();
        assert_eq!(
            ir.body,
            vec![
                Stmt::expr(Expr::compare(
                    Expr::name("a"),
                    CompareOperator::NotIn,
                    Expr::name("b")
                )),
                Stmt::expr(Expr::compare(
                    Expr::name("c"),
                    CompareOperator::IsNot,
                    Expr::none()
                )),
            ]
        );
    }

    #[test]
    fn test_boolean_chain_flattens() {
        let ir = read_python("a and b and c").unwrap();
        assert_eq!(
            ir.body,
            vec![Stmt::expr(Expr::boolean(
                BooleanOperator::And,
                vec![Expr::name("a"), Expr::name("b"), Expr::name("c")]
            ))]
        );
    }

    #[test]
    fn test_dict_splat_has_no_key() {
        let ir = read_python("d = {\"x\": 1, **rest}").unwrap();
        match &ir.body[0] {
            Stmt::Assign {
                value: Expr::Dict(entries),
                ..
            } => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].key, Some(Expr::string("x")));
                assert_eq!(entries[1].key, None);
            }
            other => panic!("expected dict assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_if_keeps_elif_in_orelse() {
        let ir = read_python("if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3\n").unwrap();
        match &ir.body[0] {
            Stmt::If { orelse, .. } => match orelse.as_slice() {
                [Stmt::If { orelse: inner, .. }] => assert_eq!(inner.len(), 1),
                other => panic!("expected nested If, got {:?}", other),
            },
            other => panic!("expected If, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_constructs_become_other() {
        let ir = read_python("f = lambda x: x\nclass A:\n    pass\ny = -1\n").unwrap();
        assert_eq!(
            ir.body,
            vec![
                Stmt::assign(vec![Expr::name("f")], Expr::other("Lambda")),
                Stmt::other("ClassDef"),
                Stmt::assign(vec![Expr::name("y")], Expr::other("UnaryOp")),
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let ir = read_python("s = 'a\\tb'\nr = r'a\\tb'\n").unwrap();
        assert_eq!(
            ir.body,
            vec![
                Stmt::assign(vec![Expr::name("s")], Expr::string("a\tb")),
                Stmt::assign(vec![Expr::name("r")], Expr::string("a\\tb")),
            ]
        );
    }

    #[test]
    fn test_numeric_escapes() {
        let ir = read_python("s = '\\x41\\u00e9\\101\\U0001F600'\nt = '\\xZ1\\q'\n").unwrap();
        assert_eq!(
            ir.body,
            vec![
                Stmt::assign(vec![Expr::name("s")], Expr::string("A\u{e9}A\u{1F600}")),
                Stmt::assign(vec![Expr::name("t")], Expr::string("\\xZ1\\q")),
            ]
        );
    }

    #[test]
    fn test_bare_call_in_function_body() {
        let ir = read_python("def f():\n    log(1)\n    return 1\n").unwrap();
        let Stmt::FunctionDef(def) = &ir.body[0] else {
            panic!("expected function, got {:?}", ir.body[0]);
        };
        assert_eq!(def.body.len(), 2);
        assert!(matches!(&def.body[0], Stmt::Expr(Expr::Call { .. })));
        assert_eq!(def.body[1], Stmt::return_stmt(Some(Expr::int(1))));
    }

    #[test]
    fn test_statement_level_updates() {
        let ir = read_python("n += 1\nfetch()\n").unwrap();
        assert_eq!(ir.body[0], Stmt::other("AugAssign"));
        assert!(matches!(&ir.body[1], Stmt::Expr(Expr::Call { .. })));
    }

    #[test]
    fn test_integer_radixes() {
        let ir = read_python("x = 0x10\ny = 1_000\n").unwrap();
        assert_eq!(
            ir.body,
            vec![
                Stmt::assign(vec![Expr::name("x")], Expr::int(16)),
                Stmt::assign(vec![Expr::name("y")], Expr::int(1000)),
            ]
        );
    }

    #[test]
    fn test_members() {
        let source = "\
import os.path
import json as j
from . import client
from .helpers import util
from typing import Any

URL = \"x\"

def get(path):
    return client.get(path)

@deprecated
def _old():
    pass

class Thing:
    pass
";
        let members = read_python_members(source).unwrap();
        assert_eq!(
            members,
            vec![
                ModuleMember::submodule("os", "os"),
                ModuleMember::submodule("j", "json"),
                ModuleMember::submodule("client", "client"),
                ModuleMember::other("util", "import"),
                ModuleMember::other("Any", "import"),
                ModuleMember::other("URL", "assignment"),
                ModuleMember::callable("get", "def get(path):\n    return client.get(path)"),
                ModuleMember::callable("_old", "@deprecated\ndef _old():\n    pass"),
                ModuleMember::other("Thing", "class"),
            ]
        );
    }
}
