use std::str::FromStr;

use rulegen_rules::{AttributeKey, ConditionId, ConditionModel, ConditionPatch, RuleError, RuleTag};

use crate::error::CliError;

/// One `--condition` argument: `tag[key=value,key=value]=text`.
///
/// The bracket group and the `=text` suffix are both optional. Text after
/// the first `=` that follows the tag (or the closing bracket) is taken
/// verbatim, so it may itself contain `=` or brackets.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionArg {
    pub tag: RuleTag,
    pub attributes: Vec<(AttributeKey, String)>,
    pub value: String,
}

impl ConditionArg {
    /// Replays the argument through the model the same way an interactive
    /// editor would: add, pick the tag, type the value, set attributes.
    pub fn apply(&self, model: &mut ConditionModel) -> ConditionId {
        let id = model.add();
        model.update(
            id,
            ConditionPatch::new().tag(self.tag).value(self.value.clone()),
        );
        for (key, value) in &self.attributes {
            model.update_attribute(id, *key, Some(value.as_str()));
        }
        id
    }
}

impl FromStr for ConditionArg {
    type Err = CliError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let split = raw.find(['[', '=']).unwrap_or(raw.len());
        let (tag_part, mut rest) = raw.split_at(split);

        let tag_part = tag_part.trim();
        if tag_part.is_empty() {
            return Err(CliError::ConditionSyntax {
                input: raw.to_string(),
                reason: "missing tag".into(),
            });
        }
        let tag: RuleTag = tag_part.parse()?;

        let mut attributes = Vec::new();
        if let Some(after_bracket) = rest.strip_prefix('[') {
            let close = after_bracket.find(']').ok_or_else(|| CliError::ConditionSyntax {
                input: raw.to_string(),
                reason: "unterminated attribute list".into(),
            })?;
            attributes = parse_attributes(raw, &after_bracket[..close])?;
            rest = &after_bracket[close + 1..];
        }

        let value = if rest.is_empty() {
            String::new()
        } else if let Some(text) = rest.strip_prefix('=') {
            text.to_string()
        } else {
            return Err(CliError::ConditionSyntax {
                input: raw.to_string(),
                reason: format!("unexpected '{}' after attribute list", rest),
            });
        };

        Ok(Self {
            tag,
            attributes,
            value,
        })
    }
}

fn parse_attributes(raw: &str, list: &str) -> Result<Vec<(AttributeKey, String)>, CliError> {
    list.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| -> Result<(AttributeKey, String), CliError> {
            let (key, value) = pair.split_once('=').ok_or_else(|| CliError::ConditionSyntax {
                input: raw.to_string(),
                reason: format!("attribute '{}' has no value", pair),
            })?;
            let key: AttributeKey = key.trim().parse().map_err(|err: RuleError| {
                CliError::ConditionSyntax {
                    input: raw.to_string(),
                    reason: err.to_string(),
                }
            })?;
            Ok((key, value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_tag() {
        let arg: ConditionArg = "list".parse().expect("parse");
        assert_eq!(arg.tag, RuleTag::List);
        assert!(arg.attributes.is_empty());
        assert!(arg.value.is_empty());
    }

    #[test]
    fn parses_tag_and_value() {
        let arg: ConditionArg = "description=Brute force = bad".parse().expect("parse");
        assert_eq!(arg.tag, RuleTag::Description);
        assert_eq!(arg.value, "Brute force = bad");
    }

    #[test]
    fn parses_attributes_in_order() {
        let arg: ConditionArg = "regex[negate=yes, type=pcre2]=^Failed [a-z]+"
            .parse()
            .expect("parse");
        assert_eq!(arg.tag, RuleTag::Regex);
        assert_eq!(
            arg.attributes,
            vec![
                (AttributeKey::Negate, "yes".to_string()),
                (AttributeKey::Type, "pcre2".to_string()),
            ]
        );
        assert_eq!(arg.value, "^Failed [a-z]+");
    }

    #[test]
    fn value_may_be_omitted_after_attributes() {
        let arg: ConditionArg = "field[name=win.eventdata.targetUserName]"
            .parse()
            .expect("parse");
        assert_eq!(arg.value, "");
        assert_eq!(arg.attributes.len(), 1);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            "".parse::<ConditionArg>(),
            Err(CliError::ConditionSyntax { .. })
        ));
        assert!(matches!(
            "bogus=1".parse::<ConditionArg>(),
            Err(CliError::Rule(RuleError::UnknownTag(_)))
        ));
        assert!(matches!(
            "field[name=x".parse::<ConditionArg>(),
            Err(CliError::ConditionSyntax { .. })
        ));
        assert!(matches!(
            "field[name]".parse::<ConditionArg>(),
            Err(CliError::ConditionSyntax { .. })
        ));
        assert!(matches!(
            "field[colour=red]".parse::<ConditionArg>(),
            Err(CliError::ConditionSyntax { .. })
        ));
        assert!(matches!(
            "field[name=x]junk".parse::<ConditionArg>(),
            Err(CliError::ConditionSyntax { .. })
        ));
    }

    #[test]
    fn apply_goes_through_pruning() {
        let arg: ConditionArg = "srcip[negate=no]=10.0.0.1".parse().expect("parse");
        let mut model = ConditionModel::new();
        let id = arg.apply(&mut model);

        let condition = model.get(id).expect("condition exists");
        assert_eq!(condition.tag, RuleTag::Srcip);
        assert_eq!(condition.value, "10.0.0.1");
        assert!(condition.attributes.is_empty());
    }
}
