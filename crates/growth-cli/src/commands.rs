//! Subcommand definitions and execution.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand, ValueEnum};
use growth_core::{UserId, UserIdentity};
use growth_mentorship::{
    EditEvent, HostEvent, MenteeActivityHandler, MentorRole, MentorshipServices, OnboardOutcome,
    UserProfile,
};
use serde_json::{Value, json};

/// Mentor slot.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RoleArg {
    /// Primary mentor.
    Primary,
    /// Backup mentor.
    Backup,
}

impl From<RoleArg> for MentorRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Primary => Self::Primary,
            RoleArg::Backup => Self::Backup,
        }
    }
}

/// A user given on the command line.
#[derive(Args, Clone, Debug)]
pub struct UserArg {
    /// User id.
    #[arg(long)]
    pub user: String,
    /// Display name (defaults to the id).
    #[arg(long)]
    pub name: Option<String>,
}

impl UserArg {
    fn identity(&self) -> UserIdentity {
        UserIdentity::new(
            self.user.as_str(),
            self.name.clone().unwrap_or_else(|| self.user.clone()),
        )
    }

    fn user_id(&self) -> UserId {
        UserId::from(self.user.as_str())
    }
}

/// Mentor given on the command line.
#[derive(Args, Clone, Debug)]
pub struct MentorArg {
    /// Mentor id.
    #[arg(long)]
    pub mentor: String,
    /// Mentor display name (defaults to the id).
    #[arg(long)]
    pub mentor_name: Option<String>,
}

impl MentorArg {
    fn identity(&self) -> UserIdentity {
        UserIdentity::new(
            self.mentor.as_str(),
            self.mentor_name.clone().unwrap_or_else(|| self.mentor.clone()),
        )
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assign a mentor to a mentee.
    SetMentor {
        #[command(flatten)]
        mentee: UserArg,
        #[command(flatten)]
        mentor: MentorArg,
        /// Slot to fill.
        #[arg(long, value_enum, default_value = "primary")]
        role: RoleArg,
    },
    /// Show a mentee's mentor.
    GetMentor {
        #[command(flatten)]
        mentee: UserArg,
        /// Slot to read.
        #[arg(long, value_enum, default_value = "primary")]
        role: RoleArg,
    },
    /// End a mentorship.
    RemoveMentor {
        #[command(flatten)]
        mentee: UserArg,
        /// Slot to clear.
        #[arg(long, value_enum, default_value = "primary")]
        role: RoleArg,
    },
    /// Whether a user has any mentor.
    IsMentee {
        #[command(flatten)]
        user: UserArg,
    },
    /// Mark a mentee active now.
    MarkActive {
        #[command(flatten)]
        user: UserArg,
    },
    /// Mark a mentee inactive.
    MarkInactive {
        #[command(flatten)]
        user: UserArg,
    },
    /// Whether a mentee counts as active.
    IsActive {
        #[command(flatten)]
        user: UserArg,
    },
    /// Deliver an edit event as the host would.
    Edit {
        #[command(flatten)]
        author: UserArg,
        /// Page id.
        #[arg(long, default_value_t = 0)]
        page: u64,
        /// Revision id.
        #[arg(long, default_value_t = 0)]
        revision: u64,
        /// Commit time, RFC 3339 (default: now).
        #[arg(long)]
        at: Option<String>,
    },
    /// List a mentor's active mentees.
    ActiveMentees {
        #[command(flatten)]
        mentor: MentorArg,
    },
    /// Assign a primary mentor if the user is eligible.
    Onboard {
        #[command(flatten)]
        user: UserArg,
        #[command(flatten)]
        mentor: MentorArg,
        /// Edits made so far.
        #[arg(long, default_value_t = 0)]
        edits: u32,
        /// Registration time, RFC 3339.
        #[arg(long)]
        registered: String,
    },
}

/// Command result in both renderings.
#[derive(Debug)]
pub struct Output {
    /// Human-readable text.
    pub text: String,
    /// Machine-readable value.
    pub json: Value,
}

impl Output {
    fn new(text: impl Into<String>, json: Value) -> Self {
        Self {
            text: text.into(),
            json,
        }
    }
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("invalid RFC 3339 timestamp: {raw}"))
}

/// Execute `command` against `services`.
pub fn run(services: &MentorshipServices, command: Command) -> Result<Output> {
    match command {
        Command::SetMentor {
            mentee,
            mentor,
            role,
        } => {
            let (mentee, mentor) = (mentee.identity(), mentor.identity());
            services.store.set_mentor(&mentee, &mentor, role.into())?;
            Ok(Output::new(
                format!("{mentor} is now {} mentor of {mentee}", MentorRole::from(role)),
                json!({ "mentee": mentee, "mentor": mentor, "role": MentorRole::from(role) }),
            ))
        }
        Command::GetMentor { mentee, role } => {
            let mentor = services
                .queries
                .get_mentor(&mentee.user_id(), role.into())?;
            let text = mentor
                .as_ref()
                .map_or_else(|| "no mentor".to_string(), ToString::to_string);
            Ok(Output::new(text, json!({ "mentor": mentor })))
        }
        Command::RemoveMentor { mentee, role } => {
            let removed = services
                .store
                .remove_assignment(&mentee.user_id(), role.into())?;
            let text = if removed { "removed" } else { "no assignment" };
            Ok(Output::new(text, json!({ "removed": removed })))
        }
        Command::IsMentee { user } => {
            let is_mentee = services.store.is_mentee(&user.user_id())?;
            Ok(Output::new(is_mentee.to_string(), json!({ "isMentee": is_mentee })))
        }
        Command::MarkActive { user } => {
            services.tracker.mark_active(&user.user_id())?;
            Ok(Output::new("marked active", json!({ "isActive": true })))
        }
        Command::MarkInactive { user } => {
            services.tracker.mark_inactive(&user.user_id())?;
            Ok(Output::new("marked inactive", json!({ "isActive": false })))
        }
        Command::IsActive { user } => {
            let active = services.queries.is_active(&user.user_id())?;
            Ok(Output::new(active.to_string(), json!({ "isActive": active })))
        }
        Command::Edit {
            author,
            page,
            revision,
            at,
        } => {
            let timestamp = at.as_deref().map_or_else(|| Ok(Utc::now()), parse_time)?;
            let report = services.dispatch(&HostEvent::PageRevisionUpdated(EditEvent {
                author: Some(author.identity()),
                page_id: page,
                revision_id: revision,
                timestamp,
            }));
            let completed = report.completed.len();
            let applied = report.outcome_of(MenteeActivityHandler::NAME);
            let summary = json!({
                "handlers": report.handler_count(),
                "completed": completed,
                "menteeActivity": applied.map(|o| format!("{o:?}")),
            });
            if let Some(failure) = report.failures.into_iter().next() {
                bail!("handler {} failed: {}", failure.handler, failure.error);
            }
            Ok(Output::new(
                format!("dispatched to {completed} handler(s)"),
                summary,
            ))
        }
        Command::ActiveMentees { mentor } => {
            let active = services
                .queries
                .list_active_mentees(&UserId::from(mentor.mentor.as_str()))?
                .collect_all()?;
            let text = active
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            Ok(Output::new(text, json!({ "activeMentees": active })))
        }
        Command::Onboard {
            user,
            mentor,
            edits,
            registered,
        } => {
            let profile = UserProfile {
                user: user.identity(),
                edit_count: edits,
                registered_at: parse_time(&registered)?,
            };
            let outcome = services
                .onboarding
                .onboard(&profile, &mentor.identity(), Utc::now())?;
            let (text, value) = match outcome {
                OnboardOutcome::Assigned => ("assigned".to_string(), json!({ "assigned": true })),
                OnboardOutcome::AlreadyAssigned { mentor } => (
                    format!("already mentored by {mentor}"),
                    json!({ "assigned": false, "mentor": mentor }),
                ),
                OnboardOutcome::Ineligible(reason) => (
                    format!("not eligible: {reason:?}"),
                    json!({ "assigned": false, "reason": format!("{reason:?}") }),
                ),
            };
            Ok(Output::new(text, value))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
