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

//! Property-based tests for Cypher name quoting.

use graphtap_neo4j::cypher::{escape_name, is_valid_identifier};
use proptest::prelude::*;

/// Undo backtick quoting.
fn unquote(rendered: &str) -> String {
    match rendered.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        Some(inner) => inner.replace("``", "`"),
        None => rendered.to_string(),
    }
}

proptest! {
    /// Any printable name survives quoting unchanged.
    #[test]
    fn prop_names_round_trip(name in "[ -~]{1,24}") {
        let rendered = escape_name(&name).unwrap();
        prop_assert_eq!(unquote(&rendered), name);
    }

    /// Bare output is always a plain identifier; everything else is quoted.
    #[test]
    fn prop_output_is_bare_or_quoted(name in "[ -~]{1,24}") {
        let rendered = escape_name(&name).unwrap();
        prop_assert!(
            is_valid_identifier(&rendered)
                || (rendered.starts_with('`') && rendered.ends_with('`') && rendered.len() >= 3)
        );
    }

    /// Case is never folded.
    #[test]
    fn prop_case_preserved(name in "[A-Za-z_][A-Za-z0-9_]{0,16}") {
        let rendered = escape_name(&name).unwrap();
        prop_assert_eq!(unquote(&rendered), name);
    }

    /// Control characters are always rejected.
    #[test]
    fn prop_control_characters_rejected(
        prefix in "[a-z]{0,8}",
        control in proptest::char::range('\u{0}', '\u{1f}'),
    ) {
        let name = format!("{}{}", prefix, control);
        prop_assert!(escape_name(&name).is_err());
    }
}
