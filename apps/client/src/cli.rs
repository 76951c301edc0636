use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::resume::{DownloadFormat, ResumeLength, TemplateId};

#[derive(Debug, Parser)]
#[command(name = "tailor", version)]
#[command(about = "Tailor a resume to a job description", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the access token
    Login {
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register {
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        confirm_password: String,
    },
    /// Forget the stored token
    Logout,
    /// Show sign-in state and available views
    Status {
        /// Keep running and report sign-in changes as they happen
        #[arg(short, long)]
        watch: bool,
    },
    /// Ping the backend
    Health,
    /// View and edit the stored profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    /// Upload a resume and generate a tailored version
    Generate(GenerateArgs),
    /// Download a generated resume
    Download {
        id: i64,
        #[arg(short, long, default_value = "pdf")]
        format: DownloadFormat,
        /// Directory or file path to write to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// List previously generated resumes
    History,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Resume to upload (.pdf or .docx)
    pub resume: PathBuf,
    #[arg(short, long, conflicts_with = "job_file")]
    pub job: Option<String>,
    /// Read the job description from a file
    #[arg(long)]
    pub job_file: Option<PathBuf>,
    #[arg(short, long, default_value = "1")]
    pub template: TemplateId,
    #[arg(short, long, default_value = "1 page")]
    pub length: ResumeLength,
    /// Feedback from a previous ATS run, sent as is
    #[arg(long)]
    pub ats_feedback: Option<String>,
    #[arg(long)]
    pub profile_name: Option<String>,
    /// Download the result right away
    #[arg(short, long)]
    pub download: Option<DownloadFormat>,
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Print the profile document
    Show,
    /// Completeness score and checklist
    Health,
    SetBasic {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    SetAbout {
        text: String,
    },
    SkillAdd {
        category: String,
        skill: String,
    },
    SkillRemove {
        category: String,
        skill: String,
    },
    /// Add a category together with its first skill
    CategoryAdd {
        category: String,
        skill: String,
    },
    ExperienceAdd(ExperienceArgs),
    ExperienceRemove {
        position: usize,
    },
    EducationAdd(EducationArgs),
    EducationRemove {
        position: usize,
    },
    CertificateAdd(CertificateArgs),
    CertificateRemove {
        position: usize,
    },
    AwardAdd(AwardArgs),
    AwardRemove {
        position: usize,
    },
}

/// Entries are addressed by 1-based position as printed by `profile show`.
/// `--replace N` edits entry N in place instead of appending.
#[derive(Debug, Args)]
pub struct ExperienceArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub start: String,
    #[arg(long, conflicts_with = "current")]
    pub end: Option<String>,
    #[arg(long)]
    pub current: bool,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub replace: Option<usize>,
}

#[derive(Debug, Args)]
pub struct EducationArgs {
    #[arg(long)]
    pub degree: String,
    #[arg(long)]
    pub school: String,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub start: String,
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub replace: Option<usize>,
}

#[derive(Debug, Args)]
pub struct CertificateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub issuer: String,
    #[arg(long)]
    pub date: String,
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long)]
    pub replace: Option<usize>,
}

#[derive(Debug, Args)]
pub struct AwardArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub issuer: String,
    #[arg(long)]
    pub date: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub replace: Option<usize>,
}
