//! Address autocomplete support.
//!
//! The wizard queries an external address-suggestion collaborator as the
//! guardian types (debounced by the front-end). Two concerns live here:
//! deterministically filling the address fields from an accepted suggestion,
//! and guarding against races between typing and selection so a cancelled
//! lookup can never surface a stale "no results" message.

/// A suggestion returned by the address collaborator. Any field may be
/// missing; the fill heuristic compensates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSuggestion {
    pub house_number: Option<String>,
    pub street: Option<String>,
    pub suburb: Option<String>,
    pub postcode: Option<String>,
    pub state: Option<String>,
}

/// The four address fields the guardian form needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFields {
    pub street: String,
    pub suburb: String,
    pub postcode: String,
    pub state: String,
}

/// Leading run of a query that looks like a house number ("12", "12a").
fn leading_numeric_token(query: &str) -> Option<&str> {
    let token = query.split_whitespace().next()?;
    if token.chars().next()?.is_ascii_digit() {
        Some(token)
    } else {
        None
    }
}

/// Fill address fields from a selected suggestion.
///
/// When the geocoder omits a house number, the query's leading numeric token
/// is taken as the house number, so "12 Acacia Ave" still produces
/// "12 Acacia Avenue" against a street-only suggestion.
pub fn apply_suggestion(query: &str, suggestion: &AddressSuggestion) -> AddressFields {
    let house_number = suggestion
        .house_number
        .as_deref()
        .or_else(|| leading_numeric_token(query));

    let street = match (house_number, suggestion.street.as_deref()) {
        (Some(number), Some(street)) => format!("{number} {street}"),
        (None, Some(street)) => street.to_string(),
        (Some(number), None) => number.to_string(),
        (None, None) => String::new(),
    };

    AddressFields {
        street,
        suburb: suggestion.suburb.clone().unwrap_or_default(),
        postcode: suggestion.postcode.clone().unwrap_or_default(),
        state: suggestion.state.clone().unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Lookup race guard
// ---------------------------------------------------------------------------

/// Token identifying one in-flight suggestion lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupToken(u64);

/// Tracks the most recent lookup so stale results are discarded.
///
/// Each keystroke begins a new lookup; selecting a suggestion or clearing
/// the field cancels. Results arriving for anything but the current token
/// are dropped, including empty ("no results") ones.
#[derive(Debug, Default)]
pub struct SuggestionSession {
    current: u64,
}

impl SuggestionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new lookup, superseding any in flight.
    pub fn begin_lookup(&mut self) -> LookupToken {
        self.current += 1;
        LookupToken(self.current)
    }

    /// Cancel the in-flight lookup (suggestion accepted or input cleared).
    pub fn cancel(&mut self) {
        self.current += 1;
    }

    /// Accept results for a lookup. Returns `None` when the token is stale,
    /// in which case the caller must not update the suggestion list.
    pub fn accept(
        &self,
        token: LookupToken,
        results: Vec<AddressSuggestion>,
    ) -> Option<Vec<AddressSuggestion>> {
        (token.0 == self.current).then_some(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion() -> AddressSuggestion {
        AddressSuggestion {
            house_number: None,
            street: Some("Acacia Avenue".into()),
            suburb: Some("Epping".into()),
            postcode: Some("2121".into()),
            state: Some("NSW".into()),
        }
    }

    // -- fill heuristic --

    #[test]
    fn fills_all_fields_from_complete_suggestion() {
        let mut s = suggestion();
        s.house_number = Some("14".into());
        let fields = apply_suggestion("14 Acacia", &s);
        assert_eq!(fields.street, "14 Acacia Avenue");
        assert_eq!(fields.suburb, "Epping");
        assert_eq!(fields.postcode, "2121");
        assert_eq!(fields.state, "NSW");
    }

    #[test]
    fn takes_house_number_from_query_when_geocoder_omits_it() {
        let fields = apply_suggestion("12 Acacia Ave", &suggestion());
        assert_eq!(fields.street, "12 Acacia Avenue");
    }

    #[test]
    fn unit_style_house_number_from_query() {
        let fields = apply_suggestion("12a Acacia Ave", &suggestion());
        assert_eq!(fields.street, "12a Acacia Avenue");
    }

    #[test]
    fn no_house_number_anywhere_keeps_bare_street() {
        let fields = apply_suggestion("Acacia Ave", &suggestion());
        assert_eq!(fields.street, "Acacia Avenue");
    }

    #[test]
    fn geocoder_house_number_wins_over_query_token() {
        let mut s = suggestion();
        s.house_number = Some("99".into());
        let fields = apply_suggestion("12 Acacia Ave", &s);
        assert_eq!(fields.street, "99 Acacia Avenue");
    }

    #[test]
    fn missing_fields_fill_empty() {
        let fields = apply_suggestion("12", &AddressSuggestion::default());
        assert_eq!(fields.street, "12");
        assert_eq!(fields.suburb, "");
        assert_eq!(fields.postcode, "");
        assert_eq!(fields.state, "");
    }

    // -- race guard --

    #[test]
    fn current_lookup_results_are_accepted() {
        let mut session = SuggestionSession::new();
        let token = session.begin_lookup();
        let results = session.accept(token, vec![suggestion()]);
        assert_eq!(results.unwrap().len(), 1);
    }

    #[test]
    fn superseded_lookup_results_are_dropped() {
        let mut session = SuggestionSession::new();
        let first = session.begin_lookup();
        let second = session.begin_lookup();

        // The older lookup's (empty) response arrives late.
        assert!(session.accept(first, vec![]).is_none());
        assert!(session.accept(second, vec![suggestion()]).is_some());
    }

    #[test]
    fn cancelled_lookup_cannot_surface_stale_no_results() {
        let mut session = SuggestionSession::new();
        let token = session.begin_lookup();
        // Guardian picks a suggestion; lookup is cancelled.
        session.cancel();
        // The in-flight "no results" response must be discarded.
        assert!(session.accept(token, vec![]).is_none());
    }
}
