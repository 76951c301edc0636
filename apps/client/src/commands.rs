//! Subcommand handlers. Each one reduces service errors to the user-facing
//! message for that view; the underlying error is logged, not printed.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use crate::auth::routes::Route;
use crate::auth::{register_error_message, LOGIN_FAILED};
use crate::cli::{
    AwardArgs, CertificateArgs, Command, EducationArgs, ExperienceArgs, GenerateArgs,
    ProfileCommand,
};
use crate::errors::ClientError;
use crate::generation::workflow::{
    GenerationRequest, GenerationStatus, SelectedFile, GENERATION_FAILED,
};
use crate::models::profile::{
    Award, Certificate, Education, Experience, Section, SectionData, UserProfile,
};
use crate::models::resume::DownloadFormat;
use crate::profile::editor::ListItem;
use crate::profile::keyed::ItemKey;
use crate::profile::session::{ProfileSession, SaveOutcome};
use crate::state::AppState;

const PROFILE_LOAD_FAILED: &str = "Failed to load profile. Please try again.";
const DOWNLOAD_FAILED: &str = "Failed to download resume. Please try again.";
const HISTORY_FAILED: &str = "Failed to load resume history. Please try again.";

const WATCH_INTERVAL: Duration = Duration::from_secs(1);

pub async fn run(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let route = state
                .auth_service()
                .login(&email, &password)
                .await
                .map_err(|e| anyhow!(e.user_message(LOGIN_FAILED)))?;
            println!("Signed in as {email}. Continue at {route}.");
        }
        Command::Register {
            email,
            password,
            confirm_password,
        } => {
            let route = state
                .auth_service()
                .register(&email, &password, &confirm_password)
                .await
                .map_err(|e| anyhow!(register_error_message(&e)))?;
            println!("Account created for {email}. Continue at {route}.");
        }
        Command::Logout => {
            let route = state.auth_service().logout()?;
            println!("Signed out. Back to {route}.");
        }
        Command::Status { watch } => {
            status(state);
            if watch {
                watch_sign_in(state).await?;
            }
        }
        Command::Health => {
            let body = state.api.health().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::Profile { action } => profile(state, action).await?,
        Command::Generate(args) => generate(state, args).await?,
        Command::Download { id, format, output } => download(state, id, format, &output).await?,
        Command::History => history(state).await?,
    }
    Ok(())
}

fn status(state: &AppState) {
    let signed_in = state.auth.is_authenticated();
    println!("Backend:   {}", state.config.api_url);
    println!("Token:     {}", state.auth.store().path().display());
    println!("Signed in: {}", if signed_in { "yes" } else { "no" });
    let links: Vec<String> = state
        .auth
        .nav_links()
        .into_iter()
        .map(|link| format!("{} ({})", link.label, link.route))
        .collect();
    println!("Views:     {}", links.join(", "));
}

/// Re-reads the token store every second and prints each sign-in change
/// until interrupted.
async fn watch_sign_in(state: &AppState) -> Result<()> {
    let mut changes = state.auth.subscribe();
    let mut ticker = tokio::time::interval(WATCH_INTERVAL);
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    println!("Watching for sign-in changes (Ctrl-C to stop)");
    loop {
        tokio::select! {
            _ = &mut interrupted => return Ok(()),
            _ = ticker.tick() => {
                state.auth.refresh();
            }
            changed = changes.changed() => {
                changed?;
                let signed_in = *changes.borrow_and_update();
                println!("Signed in: {}", if signed_in { "yes" } else { "no" });
            }
        }
    }
}

async fn open_profile(state: &AppState) -> Result<ProfileSession> {
    let landed = state.auth.navigate(Route::Profile);
    if landed != Route::Profile {
        bail!("Sign in to view your profile (redirected to {landed}).");
    }
    ProfileSession::load(state.profiles())
        .await
        .map_err(|e| anyhow!(e.user_message(PROFILE_LOAD_FAILED)))
}

async fn profile(state: &AppState, action: ProfileCommand) -> Result<()> {
    let session = open_profile(state).await?;

    let (section, result) = match action {
        ProfileCommand::Show => {
            print_profile(&session);
            return Ok(());
        }
        ProfileCommand::Health => {
            let report = session.completeness();
            println!("Profile strength: {}%", report.score);
            for item in report.checklist {
                let mark = if item.completed { "x" } else { " " };
                println!("  [{mark}] {}", item.label);
            }
            return Ok(());
        }
        ProfileCommand::SetBasic {
            name,
            email,
            phone,
            location,
        } => {
            let mut info = session.profile().profile_data.basic_info;
            info.name = name.or(info.name);
            info.email = email.or(info.email);
            info.phone = phone.or(info.phone);
            info.location = location.or(info.location);
            let result = session.save_section(SectionData::BasicInfo(info)).await;
            (Section::BasicInfo, result)
        }
        ProfileCommand::SetAbout { text } => {
            let result = session.save_section(SectionData::About(text)).await;
            (Section::About, result)
        }
        ProfileCommand::SkillAdd { category, skill } => {
            (Section::Skills, session.add_skill(&category, &skill).await)
        }
        ProfileCommand::SkillRemove { category, skill } => {
            (Section::Skills, session.remove_skill(&category, &skill).await)
        }
        ProfileCommand::CategoryAdd { category, skill } => {
            (Section::Skills, session.add_category(&category, &skill).await)
        }
        ProfileCommand::ExperienceAdd(args) => {
            let replace = args.replace;
            upsert(&session, replace, experience(args)).await
        }
        ProfileCommand::ExperienceRemove { position } => {
            remove::<Experience>(&session, position).await
        }
        ProfileCommand::EducationAdd(args) => {
            let replace = args.replace;
            upsert(&session, replace, education(args)).await
        }
        ProfileCommand::EducationRemove { position } => {
            remove::<Education>(&session, position).await
        }
        ProfileCommand::CertificateAdd(args) => {
            let replace = args.replace;
            upsert(&session, replace, certificate(args)).await
        }
        ProfileCommand::CertificateRemove { position } => {
            remove::<Certificate>(&session, position).await
        }
        ProfileCommand::AwardAdd(args) => {
            let replace = args.replace;
            upsert(&session, replace, award(args)).await
        }
        ProfileCommand::AwardRemove { position } => remove::<Award>(&session, position).await,
    };

    match result {
        Ok(SaveOutcome::Saved) => println!("Saved {section}."),
        Ok(SaveOutcome::LocalOnly) => println!(
            "No profile on this account yet; {section} was not saved. Run `tailor generate` to upload a resume first."
        ),
        Err(e) => bail!(e.user_message(&format!("Failed to save {section}. Please try again."))),
    }
    Ok(())
}

/// Resolves a 1-based position to the entry's key.
fn position_key<T: ListItem>(
    session: &ProfileSession,
    position: usize,
) -> Result<ItemKey, ClientError> {
    position
        .checked_sub(1)
        .and_then(|index| session.key_at::<T>(index))
        .ok_or_else(|| {
            ClientError::Validation(format!("No {} entry at position {position}", T::SECTION))
        })
}

async fn upsert<T: ListItem>(
    session: &ProfileSession,
    replace: Option<usize>,
    item: T,
) -> (Section, Result<SaveOutcome, ClientError>) {
    let result = match replace {
        Some(position) => match position_key::<T>(session, position) {
            Ok(key) => session.edit_item(key, item).await,
            Err(e) => Err(e),
        },
        None => session.add_item(item).await.map(|(_, outcome)| outcome),
    };
    (T::SECTION, result)
}

async fn remove<T: ListItem>(
    session: &ProfileSession,
    position: usize,
) -> (Section, Result<SaveOutcome, ClientError>) {
    let result = match position_key::<T>(session, position) {
        Ok(key) => session
            .delete_item::<T>(key)
            .await
            .map(|(_, outcome)| outcome),
        Err(e) => Err(e),
    };
    (T::SECTION, result)
}

fn experience(args: ExperienceArgs) -> Experience {
    Experience {
        title: args.title,
        company: args.company,
        location: args.location,
        start_date: args.start,
        end_date: args.end,
        current: args.current.then_some(true),
        description: args.description,
        ..Default::default()
    }
}

fn education(args: EducationArgs) -> Education {
    Education {
        degree: args.degree,
        school: args.school,
        location: args.location,
        start_date: args.start,
        end_date: args.end,
        ..Default::default()
    }
}

fn certificate(args: CertificateArgs) -> Certificate {
    Certificate {
        name: args.name,
        issuer: args.issuer,
        date: args.date,
        certificate_number: args.number,
        ..Default::default()
    }
}

fn award(args: AwardArgs) -> Award {
    Award {
        name: args.name,
        issuer: args.issuer,
        date: args.date,
        description: args.description,
        ..Default::default()
    }
}

fn print_profile(session: &ProfileSession) {
    let UserProfile {
        id,
        name,
        profile_data: data,
    } = session.profile();
    println!("{name} (id {id})");

    let info = &data.basic_info;
    for (label, value) in [
        ("Name", &info.name),
        ("Email", &info.email),
        ("Phone", &info.phone),
        ("Location", &info.location),
    ] {
        println!("  {label:<9}{}", value.as_deref().unwrap_or("-"));
    }

    if !data.about.is_empty() {
        println!("\nAbout\n  {}", data.about);
    }

    println!("\nSkills ({})", data.total_skills());
    for group in &data.skills {
        println!("  {}: {}", group.category, group.skills.join(", "));
    }

    println!("\nExperience");
    for (n, (_, e)) in session.items::<Experience>().into_iter().enumerate() {
        let end = if e.current == Some(true) {
            "present"
        } else {
            e.end_date.as_deref().unwrap_or("")
        };
        println!("  {}. {} at {} ({} - {end})", n + 1, e.title, e.company, e.start_date);
    }

    println!("\nEducation");
    for (n, (_, e)) in session.items::<Education>().into_iter().enumerate() {
        println!("  {}. {}, {} ({})", n + 1, e.degree, e.school, e.start_date);
    }

    println!("\nCertificates");
    for (n, (_, c)) in session.items::<Certificate>().into_iter().enumerate() {
        println!("  {}. {} from {} ({})", n + 1, c.name, c.issuer, c.date);
    }

    println!("\nAwards");
    for (n, (_, a)) in session.items::<Award>().into_iter().enumerate() {
        println!("  {}. {} from {} ({})", n + 1, a.name, a.issuer, a.date);
    }
}

async fn generate(state: &AppState, args: GenerateArgs) -> Result<()> {
    let job_description = match (args.job, args.job_file) {
        (Some(job), _) => job,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => String::new(),
    };

    let file = SelectedFile::new(args.resume);
    if let Some(size) = file.size_mb() {
        println!("Resume: {} ({size:.2} MB)", file.path().display());
    }

    let request = GenerationRequest {
        file: Some(file),
        job_description,
        template: args.template,
        length: args.length,
        ats_feedback: args.ats_feedback,
        profile_name: args.profile_name,
    };

    let resumes = state.resumes();
    let mut workflow = resumes.workflow();
    let resume = match workflow.run(&request).await {
        Ok(resume) => resume,
        Err(e) => match workflow.status() {
            GenerationStatus::Error(message) => bail!(message.clone()),
            _ => bail!(e.user_message(GENERATION_FAILED)),
        },
    };
    println!("Generated resume {} ({})", resume.id, resume.name);

    match args.download {
        Some(format) => download(state, resume.id, format, &args.output).await,
        None => {
            println!("Download it with `tailor download {} --format pdf|docx`", resume.id);
            Ok(())
        }
    }
}

async fn download(
    state: &AppState,
    id: i64,
    format: DownloadFormat,
    output: &std::path::Path,
) -> Result<()> {
    let saved = state
        .resumes()
        .download(id, format, output)
        .await
        .map_err(|e| anyhow!(e.user_message(DOWNLOAD_FAILED)))?;
    println!("Saved {}", saved.display());
    Ok(())
}

async fn history(state: &AppState) -> Result<()> {
    let resumes = state
        .resumes()
        .history()
        .await
        .map_err(|e| anyhow!(e.user_message(HISTORY_FAILED)))?;
    if resumes.is_empty() {
        println!("No resumes generated yet.");
        return Ok(());
    }
    for resume in resumes {
        let created = resume.created_at.as_deref().unwrap_or("-");
        println!("{:>5}  {}  {created}", resume.id, resume.name);
        let Some(analysis) = resume.analysis() else {
            continue;
        };
        if let Some(verdict) = analysis.verdict {
            println!("       {verdict}");
        }
        for strength in &analysis.strength {
            println!("       + {strength}");
        }
        for weakness in &analysis.weakness {
            println!("       - {weakness}");
        }
    }
    Ok(())
}
