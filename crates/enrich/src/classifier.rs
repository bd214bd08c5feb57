//! Display labelling of event types.
//!
//! Rewrites the provisional structural tags into the labels shown to users.
//! Tertiary labels carry the file id so that several accounts stay apart
//! once merged.

use statement_core::{EventTable, ProvisionalTag, SourceRole};

/// Maps provisional tags to display labels for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeClassifier {
    mapping: Vec<(ProvisionalTag, String)>,
}

impl TypeClassifier {
    /// Suffix of principal labels.
    pub const MAIN: &'static str = "Main";

    /// Build the mapping for a role. Built once per loaded file.
    pub fn for_role(role: &SourceRole) -> Self {
        let mapping = match role {
            SourceRole::Principal => vec![
                (ProvisionalTag::OpenDf1, open_transactions(Self::MAIN)),
                (ProvisionalTag::CloseDf1, closed_transactions(Self::MAIN)),
                (ProvisionalTag::OpenDf2, open_trades(Self::MAIN)),
            ],
            SourceRole::Tertiary(file_id) => vec![
                (ProvisionalTag::OpenDf3, open_transactions(file_id)),
                (ProvisionalTag::CloseDf3, closed_transactions(file_id)),
            ],
            SourceRole::Secondary => Vec::new(),
        };
        Self { mapping }
    }

    /// Display label for a provisional tag, if this role maps it.
    pub fn label(&self, tag: &str) -> Option<&str> {
        self.mapping
            .iter()
            .find(|(provisional, _)| provisional.as_str() == tag)
            .map(|(_, label)| label.as_str())
    }

    /// Every display label this role produces, in mapping order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.mapping.iter().map(|(_, label)| label.as_str())
    }

    /// Relabel every event; unmapped tags pass through unchanged.
    pub fn classify(&self, table: EventTable) -> EventTable {
        table.map_events(|mut event| {
            if let Some(label) = self.label(&event.event_type) {
                event.event_type = label.to_string();
            }
            event
        })
    }
}

fn open_transactions(suffix: &str) -> String {
    format!("Open Transactions - {suffix}")
}

fn closed_transactions(suffix: &str) -> String {
    format!("Closed Transactions - {suffix}")
}

fn open_trades(suffix: &str) -> String {
    format!("Open Trades - {suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use statement_core::{CopyRef, TradeEvent};

    fn event(tag: &str) -> TradeEvent {
        TradeEvent {
            time: None,
            price: None,
            profit: String::new(),
            take_profit: String::new(),
            size: None,
            ticket: "1".to_string(),
            source: "Principal".to_string(),
            event_type: tag.to_string(),
            copy_ref: CopyRef::NotApplicable,
            day: None,
            month: None,
            year: None,
        }
    }

    fn classify(role: &SourceRole, tags: &[&str]) -> Vec<String> {
        let table = EventTable::new(tags.iter().map(|t| event(t)).collect());
        TypeClassifier::for_role(role)
            .classify(table)
            .into_events()
            .into_iter()
            .map(|e| e.event_type)
            .collect()
    }

    #[test]
    fn test_principal_labels() {
        let tags = ["Open df1", "Close df1", "Open df2"];
        let labels = classify(&SourceRole::Principal, &tags);
        assert_eq!(
            labels,
            vec![
                "Open Transactions - Main",
                "Closed Transactions - Main",
                "Open Trades - Main"
            ]
        );
    }

    #[test]
    fn test_tertiary_labels_carry_file_id() {
        let role = SourceRole::Tertiary("acct77".to_string());
        let labels = classify(&role, &["Open df3", "Close df3"]);
        assert_eq!(
            labels,
            vec!["Open Transactions - acct77", "Closed Transactions - acct77"]
        );
    }

    #[test]
    fn test_every_tag_is_mapped_by_its_role() {
        let principal = TypeClassifier::for_role(&SourceRole::Principal);
        let tertiary = TypeClassifier::for_role(&SourceRole::Tertiary("x".to_string()));
        for tag in ProvisionalTag::ALL {
            let (mapped, other) = match tag {
                ProvisionalTag::OpenDf3 | ProvisionalTag::CloseDf3 => (&tertiary, &principal),
                _ => (&principal, &tertiary),
            };
            assert!(mapped.label(tag.as_str()).is_some(), "{tag} unmapped");
            assert!(other.label(tag.as_str()).is_none(), "{tag} mapped twice");
        }
    }

    #[test]
    fn test_unmapped_tags_pass_through() {
        let labels = classify(&SourceRole::Secondary, &["Open df1", "Open df2"]);
        assert_eq!(labels, vec!["Open df1", "Open df2"]);

        let labels = classify(&SourceRole::Principal, &["Open df3", "Something else"]);
        assert_eq!(labels, vec!["Open df3", "Something else"]);
    }

    #[test]
    fn test_labels_order() {
        let classifier = TypeClassifier::for_role(&SourceRole::Tertiary("b".to_string()));
        let labels: Vec<&str> = classifier.labels().collect();
        assert_eq!(
            labels,
            vec!["Open Transactions - b", "Closed Transactions - b"]
        );
    }
}
