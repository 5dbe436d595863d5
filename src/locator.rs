use crate::error::Result;
use crate::grammar::CommentGrammar;
use crate::grouper::group_comments;
use crate::language::Language;
use crate::parser::{self, CallSite};
use crate::statement::Statement;
use log::debug;

pub const DEFAULT_GHOST_METHODS: [&str; 6] = ["log", "warn", "error", "info", "debug", "trace"];

/// Which `console` methods count as a live call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MethodFilter {
    #[default]
    Any,
    Only(Vec<String>),
}

impl MethodFilter {
    pub fn allows(&self, method: &str) -> bool {
        match self {
            MethodFilter::Any => true,
            MethodFilter::Only(methods) => methods.iter().any(|m| m == method),
        }
    }
}

/// Live and ghost detection use separate allow-lists: live calls match any
/// method by default while ghosts only match the common logging methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionPolicy {
    pub live: MethodFilter,
    pub ghost_methods: Vec<String>,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self {
            live: MethodFilter::Any,
            ghost_methods: DEFAULT_GHOST_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Locator {
    policy: DetectionPolicy,
    grammar: CommentGrammar,
}

impl Locator {
    pub fn new(policy: DetectionPolicy) -> Result<Self> {
        let grammar = CommentGrammar::new(&policy.ghost_methods)?;
        Ok(Self { policy, grammar })
    }

    pub fn policy(&self) -> &DetectionPolicy {
        &self.policy
    }

    /// Returns every live and ghost console statement in `content`, ghosts
    /// first. Fails without a partial result when the source does not parse.
    pub fn locate(&self, content: &str, language: Language) -> Result<Vec<Statement>> {
        let parsed = parser::parse(content, language)?;

        let mut statements = group_comments(&parsed.comments, &self.grammar);
        let ghosts = statements.len();

        statements.extend(
            parsed
                .calls
                .iter()
                .filter(|call| self.is_live_console_call(call))
                .map(|call| Statement::live(call.location)),
        );

        debug!(
            "located {} statement(s) ({} ghost, {} live)",
            statements.len(),
            ghosts,
            statements.len() - ghosts
        );
        Ok(statements)
    }

    fn is_live_console_call(&self, call: &CallSite) -> bool {
        call.object.as_deref() == Some("console")
            && call
                .member
                .as_deref()
                .is_some_and(|member| self.policy.live.allows(member))
    }
}

/// Locates with the default detection policy.
pub fn locate(content: &str, language: Language) -> Result<Vec<Statement>> {
    Locator::new(DetectionPolicy::default())?.locate(content, language)
}
