// Dweve GraphTap - Tuple-to-Graph Sink
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cypher string escaping and name quoting.
//!
//! Index names, field names and relationship types arrive from pipeline data
//! and must reach the graph unchanged. Names are therefore never rewritten:
//! they are emitted bare when that is safe, backtick-quoted otherwise, and
//! rejected when they hold characters no quoting makes safe.

use crate::config::CypherGraphConfig;
use crate::error::{Neo4jError, Result};
use std::borrow::Cow;

/// Validate string length against configuration limits.
///
/// # Examples
///
/// ```
/// # use graphtap_neo4j::cypher::validate_string_length;
/// # use graphtap_neo4j::CypherGraphConfig;
/// let config = CypherGraphConfig::default().with_max_string_length(1000);
/// assert!(validate_string_length("test", "name", &config).is_ok());
///
/// let huge_string = "x".repeat(10_000);
/// assert!(validate_string_length(&huge_string, "description", &config).is_err());
/// ```
pub fn validate_string_length(s: &str, property: &str, config: &CypherGraphConfig) -> Result<()> {
    if let Some(max_length) = config.max_string_length {
        let length = s.len();
        if length > max_length {
            return Err(Neo4jError::StringLengthExceeded {
                length,
                max_length,
                property: property.to_string(),
            });
        }
    }
    Ok(())
}

/// Check if a string needs escaping for Cypher queries.
#[inline]
fn needs_escaping(s: &str) -> bool {
    s.chars().any(|ch| matches!(ch, '\\' | '\'' | '"' | '\n' | '\r' | '\t' | '\x00'))
}

/// Escape a string value for use in Cypher queries.
///
/// Returns `Cow::Borrowed` when nothing needs escaping.
///
/// # Examples
///
/// ```
/// # use graphtap_neo4j::cypher::escape_string;
/// let clean = escape_string("user_name");
/// assert!(matches!(clean, std::borrow::Cow::Borrowed(_)));
///
/// let dirty = escape_string("it's");
/// assert_eq!(dirty, "it\\'s");
/// ```
pub fn escape_string(s: &str) -> Cow<'_, str> {
    if !needs_escaping(s) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 10);
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\x00' => escaped.push_str("\\u0000"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Quote a string value for Cypher with single quotes.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", escape_string(s))
}

/// Check if a string is a valid bare Cypher identifier.
///
/// Valid identifiers start with a letter or underscore, and contain only
/// letters, digits, and underscores.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };

    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Characters that cannot appear in a name even when quoted.
///
/// This includes control characters, zero-width characters and bidirectional
/// formatting, which would make the stored name differ from what a reader sees.
fn is_dangerous_unicode(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            // Zero-width characters
            '\u{200B}' // Zero-width space
            | '\u{200C}' // Zero-width non-joiner
            | '\u{200D}' // Zero-width joiner
            | '\u{FEFF}' // Zero-width no-break space
            // Directional formatting
            | '\u{202A}' // Left-to-right embedding
            | '\u{202B}' // Right-to-left embedding
            | '\u{202C}' // Pop directional formatting
            | '\u{202D}' // Left-to-right override
            | '\u{202E}' // Right-to-left override
            | '\u{2066}' // Left-to-right isolate
            | '\u{2067}' // Right-to-left isolate
            | '\u{2068}' // First strong isolate
            | '\u{2069}' // Pop directional isolate
        )
}

/// Render a label, property key or relationship type for Cypher.
///
/// Safe identifiers are returned bare; anything else (including reserved
/// words) is wrapped in backticks with embedded backticks doubled. Case and
/// spelling are preserved.
///
/// # Errors
///
/// [`Neo4jError::InvalidIdentifier`] for empty names and names containing
/// control, zero-width or bidirectional-formatting characters.
///
/// # Examples
///
/// ```
/// # use graphtap_neo4j::cypher::escape_name;
/// assert_eq!(escape_name("name").unwrap(), "name");
/// assert_eq!(escape_name("years of citizenship").unwrap(), "`years of citizenship`");
/// assert_eq!(escape_name("MATCH").unwrap(), "`MATCH`");
/// assert!(escape_name("").is_err());
/// ```
pub fn escape_name(s: &str) -> Result<String> {
    if s.is_empty() || s.chars().any(is_dangerous_unicode) {
        return Err(Neo4jError::InvalidIdentifier(s.escape_debug().to_string()));
    }

    if is_valid_identifier(s) && !is_cypher_keyword(s) {
        Ok(s.to_string())
    } else {
        Ok(format!("`{}`", s.replace('`', "``")))
    }
}

/// Render a label as `:Label`.
///
/// ```
/// # use graphtap_neo4j::cypher::escape_label;
/// assert_eq!(escape_label("users").unwrap(), ":users");
/// assert_eq!(escape_label("my-users").unwrap(), ":`my-users`");
/// ```
pub fn escape_label(s: &str) -> Result<String> {
    Ok(format!(":{}", escape_name(s)?))
}

/// Render a relationship type as `:TYPE`, preserving case.
///
/// ```
/// # use graphtap_neo4j::cypher::escape_relationship_type;
/// assert_eq!(escape_relationship_type("NATIONALITY").unwrap(), ":NATIONALITY");
/// assert_eq!(escape_relationship_type("lives-in").unwrap(), ":`lives-in`");
/// ```
pub fn escape_relationship_type(s: &str) -> Result<String> {
    Ok(format!(":{}", escape_name(s)?))
}

/// Check if a string is a Cypher reserved keyword.
fn is_cypher_keyword(s: &str) -> bool {
    matches!(
        s.to_uppercase().as_str(),
        "ALL"
            | "AND"
            | "ANY"
            | "AS"
            | "ASC"
            | "ASCENDING"
            | "BY"
            | "CALL"
            | "CASE"
            | "CONTAINS"
            | "COUNT"
            | "CREATE"
            | "DELETE"
            | "DESC"
            | "DESCENDING"
            | "DETACH"
            | "DISTINCT"
            | "DO"
            | "DROP"
            | "ELSE"
            | "END"
            | "ENDS"
            | "EXISTS"
            | "FALSE"
            | "FILTER"
            | "FOREACH"
            | "IN"
            | "IS"
            | "LIMIT"
            | "MANDATORY"
            | "MATCH"
            | "MERGE"
            | "NODE"
            | "NONE"
            | "NOT"
            | "NULL"
            | "OF"
            | "ON"
            | "OPTIONAL"
            | "OR"
            | "ORDER"
            | "REDUCE"
            | "RELATIONSHIP"
            | "REMOVE"
            | "RETURN"
            | "SET"
            | "SINGLE"
            | "SKIP"
            | "SOME"
            | "STARTS"
            | "THEN"
            | "TRUE"
            | "UNION"
            | "UNIQUE"
            | "UNWIND"
            | "USING"
            | "WHEN"
            | "WHERE"
            | "WITH"
            | "XOR"
            | "YIELD"
    )
}
