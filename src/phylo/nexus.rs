// nexus.rs - Tree extraction from NEXUS TREES blocks

use std::collections::HashMap;
use regex::Regex;
use crate::phylo::newick::parse_newick;
use crate::phylo::tree::Tree;
use crate::phylo::TreeError;

/// True when the text starts with the `#NEXUS` marker
pub fn is_nexus(text: &str) -> bool {
    text.trim_start()
        .get(..6)
        .map(|head| head.eq_ignore_ascii_case("#NEXUS"))
        .unwrap_or(false)
}

/// Parse the first `tree NAME = ...;` statement of a NEXUS document,
/// applying its TRANSLATE table to node labels
pub fn parse_nexus(text: &str) -> Result<Tree, TreeError> {
    let tree_re = Regex::new(r"(?im)^\s*tree\s+[^=\n]+=\s*").map_err(regex_error)?;
    let statement = tree_re.find(text).ok_or(TreeError::MissingTreeBlock)?;

    let mut tree = parse_newick(&text[statement.end()..])?;

    let table = translate_table(&text[..statement.start()])?;
    if !table.is_empty() {
        tree.translate_labels(&table);
    }
    Ok(tree)
}

/// Entries of the last TRANSLATE command before the tree statement
pub fn translate_table(text: &str) -> Result<HashMap<String, String>, TreeError> {
    let translate_re = Regex::new(r"(?is)\btranslate\b(.*?);").map_err(regex_error)?;
    let mut table = HashMap::new();

    if let Some(caps) = translate_re.captures_iter(text).last() {
        for entry in caps[1].split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (token, name) = entry
                .split_once(char::is_whitespace)
                .ok_or_else(|| TreeError::Syntax {
                    position: 0,
                    message: format!("malformed TRANSLATE entry '{}'", entry),
                })?;
            let name = name.trim();
            let name = name
                .strip_prefix('\'')
                .and_then(|n| n.strip_suffix('\''))
                .or_else(|| name.strip_prefix('"').and_then(|n| n.strip_suffix('"')))
                .unwrap_or(name);
            table.insert(token.to_string(), name.to_string());
        }
    }

    Ok(table)
}

fn regex_error(e: regex::Error) -> TreeError {
    TreeError::Syntax {
        position: 0,
        message: format!("internal pattern error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEAST_NEXUS: &str = "#NEXUS

Begin taxa;
\tDimensions ntax=3;
\tTaxlabels
\t\tseqA|2021-03-01
\t\tseqB|2022-05-12
\t\t'seq C|2023-12-04'
\t\t;
End;

Begin trees;
\tTranslate
\t\t1 seqA|2021-03-01,
\t\t2 seqB|2022-05-12,
\t\t3 'seq C|2023-12-04'
;
tree TREE1 = [&R] ((1[&region=\"Coast\"]:1.0,2[&region=\"Western\"]:2.0)[&region=\"Coast\"]:0.5,3[&region=\"Nairobi\"]:2.5)[&region=\"Coast\"];
End;
";

    #[test]
    fn test_detect_nexus() {
        assert!(is_nexus("  #NEXUS\nbegin trees;"));
        assert!(is_nexus("#nexus"));
        assert!(!is_nexus("(A,B);"));
        assert!(!is_nexus(""));
    }

    #[test]
    fn test_parse_beast_nexus() {
        let tree = parse_nexus(BEAST_NEXUS).unwrap();
        let labels: Vec<_> = tree.leaves().filter_map(|n| n.label.as_deref()).collect();
        assert_eq!(labels, vec!["seqA|2021-03-01", "seqB|2022-05-12", "seq C|2023-12-04"]);
        assert_eq!(tree.node(0).traits.get("region").map(String::as_str), Some("Coast"));
        assert_eq!(tree.stats().tips, 3);
    }

    #[test]
    fn test_nexus_without_translate() {
        let text = "#NEXUS\nbegin trees;\n  tree one = (A:1,B:1);\nend;";
        let tree = parse_nexus(text).unwrap();
        let labels: Vec<_> = tree.leaves().filter_map(|n| n.label.as_deref()).collect();
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn test_missing_tree_statement() {
        let text = "#NEXUS\nbegin trees;\nend;";
        assert!(matches!(parse_nexus(text), Err(TreeError::MissingTreeBlock)));
    }

    #[test]
    fn test_translate_table() {
        let table = translate_table("translate 1 a, 2 'b c', 3 \"d\";").unwrap();
        assert_eq!(table.get("1").map(String::as_str), Some("a"));
        assert_eq!(table.get("2").map(String::as_str), Some("b c"));
        assert_eq!(table.get("3").map(String::as_str), Some("d"));
    }
}
