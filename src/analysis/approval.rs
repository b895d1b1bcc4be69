//! Decides whether a review comment counts as an approval.
//!
//! GitHub reviews carry an explicit review state; BitBucket comments do not,
//! so both platforms fall back to matching the comment text against
//! configurable [`ApprovalMarkers`].

use std::sync::Arc;

use crate::model::{Comment, RepositoryKind, ReviewState};

/// Approval strings that count when they are the whole comment.
pub const DEFAULT_EXPLICIT_APPROVALS: &[&str] =
    &["lgtm", "approved", "+1", ":+1:", "\u{1f44d}", "ship it", ":shipit:"];

/// Strings that veto an approval wherever they appear in a comment.
pub const DEFAULT_EXPLICIT_NON_APPROVALS: &[&str] = &[
    "not lgtm",
    "do not merge",
    "don't merge",
    "dont merge",
    "not approved",
    "needs work",
];

/// Strings that signal approval anywhere inside a longer comment.
pub const DEFAULT_IMPLICIT_APPROVALS: &[&str] = &["lgtm", "looks good to me", "ship it"];

/// Classifies a single review comment.
pub trait ApprovalAnalyzer: Send + Sync {
    /// Returns true when `comment` approves the pull request.
    fn is_approved(&self, comment: &Comment) -> bool;
}

/// Text markers used to recognise approvals in free-form comments.
///
/// Markers and comment text are compared after trimming and lower-casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalMarkers {
    explicit_approvals: Vec<String>,
    explicit_non_approvals: Vec<String>,
    implicit_approvals: Vec<String>,
}

impl ApprovalMarkers {
    /// Builds a marker set, normalising every entry and dropping blanks.
    pub fn new<A, N, I>(explicit_approvals: A, explicit_non_approvals: N, implicit_approvals: I) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            explicit_approvals: normalise_all(explicit_approvals),
            explicit_non_approvals: normalise_all(explicit_non_approvals),
            implicit_approvals: normalise_all(implicit_approvals),
        }
    }

    /// Markers that approve when they make up the entire comment.
    #[must_use]
    pub fn explicit_approvals(&self) -> &[String] {
        &self.explicit_approvals
    }

    /// Markers that veto an approval.
    #[must_use]
    pub fn explicit_non_approvals(&self) -> &[String] {
        &self.explicit_non_approvals
    }

    /// Markers that approve when contained in the comment.
    #[must_use]
    pub fn implicit_approvals(&self) -> &[String] {
        &self.implicit_approvals
    }

    /// Applies the markers to `text`.
    ///
    /// Non-approval markers win over everything else, then an exact explicit
    /// match, then any contained implicit marker.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let normalised = normalise(text);
        if normalised.is_empty() {
            return false;
        }
        if self
            .explicit_non_approvals
            .iter()
            .any(|marker| normalised.contains(marker.as_str()))
        {
            return false;
        }
        self.explicit_approvals.iter().any(|marker| *marker == normalised)
            || self
                .implicit_approvals
                .iter()
                .any(|marker| normalised.contains(marker.as_str()))
    }
}

impl Default for ApprovalMarkers {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXPLICIT_APPROVALS.iter().copied(),
            DEFAULT_EXPLICIT_NON_APPROVALS.iter().copied(),
            DEFAULT_IMPLICIT_APPROVALS.iter().copied(),
        )
    }
}

fn normalise(text: &str) -> String {
    text.trim().to_lowercase()
}

fn normalise_all<T>(markers: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    markers
        .into_iter()
        .map(|marker| normalise(marker.as_ref()))
        .filter(|marker| !marker.is_empty())
        .collect()
}

/// Approval rules for GitHub: review state first, then text markers.
#[derive(Debug, Clone, Default)]
pub struct GitHubApprovalAnalyzer {
    markers: ApprovalMarkers,
}

impl GitHubApprovalAnalyzer {
    /// Creates an analyser using `markers` for comments without a decisive
    /// review state.
    #[must_use]
    pub const fn new(markers: ApprovalMarkers) -> Self {
        Self { markers }
    }
}

impl ApprovalAnalyzer for GitHubApprovalAnalyzer {
    fn is_approved(&self, comment: &Comment) -> bool {
        match comment.review_state {
            Some(ReviewState::Approved) => true,
            Some(ReviewState::ChangesRequested) => false,
            _ => self.markers.matches(&comment.text),
        }
    }
}

/// Approval rules for BitBucket, which only has comment text to go on.
#[derive(Debug, Clone, Default)]
pub struct BitBucketApprovalAnalyzer {
    markers: ApprovalMarkers,
}

impl BitBucketApprovalAnalyzer {
    /// Creates an analyser matching comment text against `markers`.
    #[must_use]
    pub const fn new(markers: ApprovalMarkers) -> Self {
        Self { markers }
    }
}

impl ApprovalAnalyzer for BitBucketApprovalAnalyzer {
    fn is_approved(&self, comment: &Comment) -> bool {
        self.markers.matches(&comment.text)
    }
}

/// Picks the approval rules for a hosting platform.
#[must_use]
pub fn approval_analyzer_for(
    kind: RepositoryKind,
    markers: ApprovalMarkers,
) -> Arc<dyn ApprovalAnalyzer> {
    match kind {
        RepositoryKind::GitHub => Arc::new(GitHubApprovalAnalyzer::new(markers)),
        RepositoryKind::BitBucket => Arc::new(BitBucketApprovalAnalyzer::new(markers)),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        ApprovalAnalyzer, ApprovalMarkers, BitBucketApprovalAnalyzer, GitHubApprovalAnalyzer,
    };
    use crate::model::ReviewState;
    use crate::model::test_support::{comment, review};

    #[rstest]
    #[case::explicit_exact("LGTM", true)]
    #[case::explicit_padded("  Ship It \n", true)]
    #[case::implicit_contained("Nice refactor, looks good to me!", true)]
    #[case::veto_wins("not LGTM yet", false)]
    #[case::do_not_merge("LGTM but do not merge before Friday", false)]
    #[case::explicit_only_when_whole("approved by whom?", false)]
    #[case::blank("   ", false)]
    #[case::unrelated("Could you rename this?", false)]
    fn default_markers_classify_text(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(ApprovalMarkers::default().matches(text), expected);
    }

    #[test]
    fn custom_markers_are_normalised() {
        let markers = ApprovalMarkers::new([" Yes Please "], ["  "], Vec::<String>::new());

        assert_eq!(markers.explicit_approvals(), ["yes please".to_owned()]);
        assert!(markers.explicit_non_approvals().is_empty());
        assert!(markers.matches("YES PLEASE"));
        assert!(!markers.matches("lgtm"));
    }

    #[rstest]
    #[case::approved_state(Some(ReviewState::Approved), "", true)]
    #[case::changes_requested_beats_text(Some(ReviewState::ChangesRequested), "lgtm", false)]
    #[case::dismissed_falls_back(Some(ReviewState::Dismissed), "lgtm", true)]
    #[case::no_state_falls_back(None, "looks good to me", true)]
    #[case::no_state_no_marker(None, "why?", false)]
    fn github_prefers_review_state(
        #[case] state: Option<ReviewState>,
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        let analyzer = GitHubApprovalAnalyzer::default();
        let mut candidate = comment(1, text, "alice");
        candidate.review_state = state;

        assert_eq!(analyzer.is_approved(&candidate), expected);
    }

    #[test]
    fn bitbucket_ignores_review_state() {
        let analyzer = BitBucketApprovalAnalyzer::default();

        assert!(!analyzer.is_approved(&review(1, "", "alice", ReviewState::Approved)));
        assert!(analyzer.is_approved(&comment(2, "lgtm", "alice")));
    }
}
