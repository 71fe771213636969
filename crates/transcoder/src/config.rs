//! Token tables: the per-target-language translation configuration.
//!
//! A token table has six categories, each a flat mapping from a fixed set of
//! token names to literal strings. Example `javascript.toml`:
//!
//! ```toml
//! [function]
//! define_key = "function "
//! return_key = "return "
//! argument_separator = ", "
//! open_body = " {"
//! close_body = "\n}"
//!
//! [assignment]
//! assign_key = " = "
//!
//! [operator]
//! add = " + "
//! equal = " === "
//!
//! [access]
//! attribute = "."
//! subscript_open = "["
//! subscript_close = "]"
//! ```
//!
//! Unknown token names are rejected when the table is loaded. Missing ones
//! are accepted; a node that needs a missing token translates to empty text.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Error loading or building a token table.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML token table: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON token table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML token table: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported token table format: {0}")]
    Format(String),

    #[error("unknown token: {0}")]
    UnknownToken(String),
}

// ============================================================================
// Token names
// ============================================================================

/// A fixed, enumerable set of token names forming one category.
pub trait TokenName: Copy + Ord + fmt::Debug + 'static {
    /// Category name as it appears in the token table.
    const CATEGORY: &'static str;
    /// Every token of the category.
    const ALL: &'static [Self];

    /// Token name as it appears in the token table.
    fn key(self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|token| token.key() == key)
    }

    /// `category.key`, for messages.
    fn qualified(self) -> String {
        format!("{}.{}", Self::CATEGORY, self.key())
    }
}

macro_rules! token_names {
    (
        $(#[$meta:meta])*
        $name:ident in $category:literal {
            $($variant:ident => $key:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant,)*
        }

        impl TokenName for $name {
            const CATEGORY: &'static str = $category;
            const ALL: &'static [Self] = &[$($name::$variant,)*];

            fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)*
                }
            }
        }
    };
}

token_names! {
    /// Function definitions, calls and returns.
    FunctionToken in "function" {
        DefineKey => "define_key",
        ReturnKey => "return_key",
        ArgumentSeparator => "argument_separator",
        OpenBody => "open_body",
        CloseBody => "close_body",
    }
}

token_names! {
    AssignmentToken in "assignment" {
        AssignKey => "assign_key",
        MultipleAssignBegin => "multiple_assign_begin",
        MultipleAssignEnd => "multiple_assign_end",
        MultipleAssignJoin => "multiple_assign_join",
    }
}

token_names! {
    /// Binary, boolean and comparison operators.
    OperatorToken in "operator" {
        Add => "add",
        Sub => "sub",
        Mult => "mult",
        MatMult => "mat_mult",
        Div => "div",
        Mod => "mod",
        Pow => "pow",
        LShift => "l_shift",
        RShift => "r_shift",
        BitOr => "bit_or",
        BitXor => "bit_xor",
        BitAnd => "bit_and",
        FloorDiv => "floor_div",
        AndOp => "and_op",
        OrOp => "or_op",
        Equal => "equal",
        NotEqual => "not_equal",
        LowerThan => "lower_than",
        LowerThanEqual => "lower_than_equal",
        GreaterThan => "greater_than",
        GreaterThanEqual => "greater_than_equal",
        IsOp => "is_op",
        IsNotOp => "is_not_op",
        InOp => "in_op",
        NotInOp => "not_in_op",
    }
}

token_names! {
    /// Attribute and subscript access.
    AccessToken in "access" {
        SubscriptOpen => "subscript_open",
        SubscriptClose => "subscript_close",
        Attribute => "attribute",
    }
}

token_names! {
    /// Container literals, plus optional spellings for constants.
    LiteralToken in "literals" {
        ListBegin => "list_begin",
        ListEnd => "list_end",
        ListJoin => "list_join",
        TupleBegin => "tuple_begin",
        TupleEnd => "tuple_end",
        TupleJoin => "tuple_join",
        DictBegin => "dict_begin",
        DictEnd => "dict_end",
        DictJoin => "dict_join",
        DictAssign => "dict_assign",
        TrueLiteral => "true_literal",
        FalseLiteral => "false_literal",
        NullLiteral => "null_literal",
        StringBegin => "string_begin",
        StringEnd => "string_end",
    }
}

token_names! {
    /// Control flow. `return_key` here is a fallback for `function.return_key`.
    FlowToken in "flow" {
        WhileKey => "while_key",
        WhileBegin => "while_begin",
        WhileEnd => "while_end",
        WhileOpenBody => "while_open_body",
        WhileCloseBody => "while_close_body",
        IfKey => "if_key",
        IfBegin => "if_begin",
        IfEnd => "if_end",
        IfOpenBody => "if_open_body",
        IfCloseBody => "if_close_body",
        ForeachKey => "foreach_key",
        ForeachBegin => "foreach_begin",
        ForeachEnd => "foreach_end",
        ForeachOpenBody => "foreach_open_body",
        ForeachCloseBody => "foreach_close_body",
        ForeachSeparator => "foreach_separator",
        ReturnKey => "return_key",
    }
}

// ============================================================================
// TokenTable
// ============================================================================

/// One category of a token table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTable<T: TokenName> {
    entries: BTreeMap<T, String>,
}

impl<T: TokenName> Default for TokenTable<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: TokenName> TokenTable<T> {
    pub fn get(&self, token: T) -> Option<&str> {
        self.entries.get(&token).map(String::as_str)
    }

    /// Present and non-empty.
    pub fn is_set(&self, token: T) -> bool {
        self.get(token).is_some_and(|value| !value.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        let token = T::from_key(key)
            .ok_or_else(|| ConfigError::UnknownToken(format!("{}.{}", T::CATEGORY, key)))?;
        self.entries.insert(token, value);
        Ok(())
    }
}

impl<'de, T: TokenName> Deserialize<'de> for TokenTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut table = Self::default();
        for (key, value) in raw {
            table
                .insert(&key, value)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(table)
    }
}

impl<T: TokenName> Serialize for TokenTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.entries
                .iter()
                .map(|(token, value)| (token.key(), value)),
        )
    }
}

impl<T: TokenName> FromIterator<(T, String)> for TokenTable<T> {
    fn from_iter<I: IntoIterator<Item = (T, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// TranslationConfig
// ============================================================================

/// Token table for one target language. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslationConfig {
    pub function: TokenTable<FunctionToken>,
    #[serde(alias = "assignement")]
    pub assignment: TokenTable<AssignmentToken>,
    pub operator: TokenTable<OperatorToken>,
    pub access: TokenTable<AccessToken>,
    pub literals: TokenTable<LiteralToken>,
    pub flow: TokenTable<FlowToken>,
}

impl TranslationConfig {
    /// Load a token table, picking the format from the file extension
    /// (`.toml`, `.json`, `.yaml`/`.yml`).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            other => Err(ConfigError::Format(
                other.unwrap_or("<no extension>").to_string(),
            )),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Build a table from `category.token` keyed pairs.
    ///
    /// ```
    /// use transcoder::config::{FunctionToken, TranslationConfig};
    ///
    /// let config = TranslationConfig::from_pairs([("function.define_key", "fn ")]).unwrap();
    /// assert_eq!(config.function.get(FunctionToken::DefineKey), Some("fn "));
    /// ```
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (qualified, value) in pairs {
            let qualified = qualified.as_ref();
            let (category, key) = qualified
                .split_once('.')
                .ok_or_else(|| ConfigError::UnknownToken(qualified.to_string()))?;
            let value = value.into();
            match category {
                "function" => config.function.insert(key, value)?,
                "assignment" | "assignement" => config.assignment.insert(key, value)?,
                "operator" => config.operator.insert(key, value)?,
                "access" => config.access.insert(key, value)?,
                "literals" => config.literals.insert(key, value)?,
                "flow" => config.flow.insert(key, value)?,
                _ => return Err(ConfigError::UnknownToken(qualified.to_string())),
            }
        }
        Ok(config)
    }
}
