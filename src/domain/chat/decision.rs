//! Decision logic: what the workflow should do next.
//!
//! Pure, total function over the extracted field set and user class. Only
//! outright key absence triggers the more-info branch; a key present with a
//! null or empty value counts as gathered.

use super::types::{ExtractedFields, UserClass};

/// Action asking the conversation to keep gathering details.
pub const ACTION_GATHER_MORE_INFO: &str = "gather_more_info";
/// Action to match a customer with tradespeople.
pub const ACTION_FIND_TRADESPEOPLE: &str = "find_tradespeople";
/// Action to show a tradesperson open jobs.
pub const ACTION_SHOW_JOB_OPPORTUNITIES: &str = "show_job_opportunities";
/// Action returned when processing failed and the caller should retry.
pub const ACTION_RETRY: &str = "retry";

/// A workflow decision for one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether the intake still needs more information.
    pub requires_more_info: bool,
    /// The next workflow action.
    pub next_action: &'static str,
}

/// Decides the next workflow action from the extracted fields.
pub fn decide(fields: &ExtractedFields, user_class: UserClass) -> Decision {
    let requires_more_info = needs_more_info(fields, user_class);

    let next_action = if requires_more_info {
        ACTION_GATHER_MORE_INFO
    } else {
        match user_class {
            UserClass::Customer => ACTION_FIND_TRADESPEOPLE,
            UserClass::Tradesperson => ACTION_SHOW_JOB_OPPORTUNITIES,
        }
    };

    Decision {
        requires_more_info,
        next_action,
    }
}

fn needs_more_info(fields: &ExtractedFields, user_class: UserClass) -> bool {
    match user_class {
        UserClass::Customer => !fields.contains("serviceType") || !fields.contains("urgency"),
        UserClass::Tradesperson => !fields.contains("qualified") || !fields.contains("availability"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::Value;

    fn fields_with(keys: &[&str]) -> ExtractedFields {
        let mut fields = ExtractedFields::new();
        for key in keys {
            fields.insert_text(*key, "x");
        }
        fields
    }

    #[test]
    fn customer_missing_urgency_needs_more_info() {
        let fields = fields_with(&["serviceType"]);
        let decision = decide(&fields, UserClass::Customer);

        assert!(decision.requires_more_info);
        assert_eq!(decision.next_action, ACTION_GATHER_MORE_INFO);
    }

    #[test]
    fn customer_with_service_and_urgency_finds_tradespeople() {
        let fields = fields_with(&["serviceType", "urgency"]);
        let decision = decide(&fields, UserClass::Customer);

        assert!(!decision.requires_more_info);
        assert_eq!(decision.next_action, ACTION_FIND_TRADESPEOPLE);
    }

    #[test]
    fn tradesperson_with_qualification_and_availability_sees_jobs() {
        let fields = fields_with(&["qualified", "availability"]);
        let decision = decide(&fields, UserClass::Tradesperson);

        assert!(!decision.requires_more_info);
        assert_eq!(decision.next_action, ACTION_SHOW_JOB_OPPORTUNITIES);
    }

    #[test]
    fn tradesperson_missing_availability_needs_more_info() {
        let fields = fields_with(&["qualified"]);
        let decision = decide(&fields, UserClass::Tradesperson);

        assert!(decision.requires_more_info);
        assert_eq!(decision.next_action, ACTION_GATHER_MORE_INFO);
    }

    #[test]
    fn empty_fields_always_need_more_info() {
        let fields = ExtractedFields::new();
        assert!(decide(&fields, UserClass::Customer).requires_more_info);
        assert!(decide(&fields, UserClass::Tradesperson).requires_more_info);
    }

    #[test]
    fn null_valued_key_counts_as_present() {
        let mut fields = ExtractedFields::new();
        fields.insert("serviceType", Value::Null);
        fields.insert("urgency", Value::String(String::new()));

        let decision = decide(&fields, UserClass::Customer);
        assert!(!decision.requires_more_info);
        assert_eq!(decision.next_action, ACTION_FIND_TRADESPEOPLE);
    }

    #[test]
    fn customer_keys_do_not_satisfy_tradesperson() {
        let fields = fields_with(&["serviceType", "urgency"]);
        let decision = decide(&fields, UserClass::Tradesperson);
        assert!(decision.requires_more_info);
    }

    proptest! {
        /// Same inputs always produce the same decision, and the action
        /// pairs with the more-info flag.
        #[test]
        fn decide_is_deterministic_and_consistent(
            keys in proptest::collection::vec("[a-zA-Z]{1,12}", 0..6),
            customer in any::<bool>(),
        ) {
            let user_class = if customer {
                UserClass::Customer
            } else {
                UserClass::Tradesperson
            };
            let fields = fields_with(&keys.iter().map(String::as_str).collect::<Vec<_>>());

            let first = decide(&fields, user_class);
            let second = decide(&fields, user_class);
            prop_assert_eq!(&first, &second);

            if first.requires_more_info {
                prop_assert_eq!(first.next_action, ACTION_GATHER_MORE_INFO);
            } else {
                prop_assert_ne!(first.next_action, ACTION_GATHER_MORE_INFO);
            }
        }
    }
}
