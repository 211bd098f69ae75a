//! Command handlers. Each one reads or mutates the single session store and
//! prints a locale-appropriate line; handlers return whether the operation
//! succeeded so `main` can set the exit code.

use anyhow::Result;
use rustyline::DefaultEditor;
use std::cell::RefCell;

use crate::audit::AuditLog;
use crate::backend::SignupOutcome;
use crate::config::Config;
use crate::error::AuthError;
use crate::feed::FeedClient;
use crate::identity::{Nationality, ProfileUpdate, SignupData};
use crate::messages::{self, Locale};
use crate::store::SessionStore;
use crate::validation;

pub struct Context {
    pub config: Config,
    pub store: SessionStore,
    pub audit: RefCell<AuditLog>,
}

impl Context {
    fn locale(&self) -> Locale {
        self.config.locale
    }
}

/// Lazily created readline editor for fields not passed as flags.
struct Prompter {
    editor: Option<DefaultEditor>,
}

impl Prompter {
    fn new() -> Self {
        Self { editor: None }
    }

    fn ask(&mut self, label: &str, provided: Option<String>) -> Result<String> {
        if let Some(value) = provided {
            return Ok(value);
        }
        if self.editor.is_none() {
            self.editor = Some(DefaultEditor::new()?);
        }
        let line = self
            .editor
            .as_mut()
            .expect("editor just created")
            .readline(&format!("{}: ", label))?;
        Ok(line.trim().to_string())
    }
}

fn report_error(ctx: &Context, err: &AuthError) {
    eprintln!("{}", messages::auth_error(err, ctx.locale()));
}

pub fn cmd_login(ctx: &mut Context, email: Option<String>, password: Option<String>) -> Result<bool> {
    let mut prompter = Prompter::new();
    let email = prompter.ask("Email", email)?;
    let password = prompter.ask("Password", password)?;

    let backend = ctx.store.backend_name();
    match ctx.store.login(&email, &password) {
        Ok(()) => {
            ctx.audit.borrow_mut().login_ok(backend, &email)?;
            let name = ctx.store.user().map(|u| u.name.as_str()).unwrap_or("");
            println!("{} ({})", messages::signed_in(ctx.locale()), name);
            Ok(true)
        }
        Err(err) => {
            ctx.audit
                .borrow_mut()
                .login_failed(backend, &email, &err.to_string())?;
            report_error(ctx, &err);
            Ok(false)
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_signup(
    ctx: &mut Context,
    email: Option<String>,
    password: Option<String>,
    name: Option<String>,
    university: Option<String>,
    nationality: Option<String>,
    major: Option<String>,
    year: Option<u32>,
) -> Result<bool> {
    let mut prompter = Prompter::new();

    let email = prompter.ask("Email", email)?;
    if let Err(err) = validation::check_email(&email) {
        report_error(ctx, &err);
        return Ok(false);
    }

    // A password given as a flag skips the confirmation prompt.
    let (password, confirm) = match password {
        Some(p) => {
            let confirm = p.clone();
            (p, confirm)
        }
        None => {
            let p = prompter.ask("Password", None)?;
            let c = prompter.ask("Confirm password", None)?;
            (p, c)
        }
    };
    if let Err(err) = validation::check_password(&password, &confirm) {
        report_error(ctx, &err);
        return Ok(false);
    }

    let name = prompter.ask("Name", name)?;
    let university = ask_university(&mut prompter, university)?;
    let nationality = ask_nationality(&mut prompter, nationality)?;
    let major = prompter.ask("Major", major)?;
    let year = match year {
        Some(y) => y,
        None => prompter.ask("Year (1-6)", None)?.parse().unwrap_or(1),
    };

    let data = SignupData {
        email: email.clone(),
        password,
        name,
        university,
        nationality,
        major,
        year,
    };

    let backend = ctx.store.backend_name();
    match ctx.store.signup(&data) {
        Ok(SignupOutcome::SignedIn(_)) => {
            ctx.audit.borrow_mut().signup_ok(backend, &email, true)?;
            println!("{}", messages::welcome(ctx.locale()));
            Ok(true)
        }
        Ok(SignupOutcome::Registered) => {
            ctx.audit.borrow_mut().signup_ok(backend, &email, false)?;
            println!("{}", messages::account_created_sign_in(ctx.locale()));
            Ok(true)
        }
        Err(err) => {
            ctx.audit
                .borrow_mut()
                .signup_failed(backend, &email, &err.to_string())?;
            report_error(ctx, &err);
            Ok(false)
        }
    }
}

fn ask_university(prompter: &mut Prompter, provided: Option<String>) -> Result<String> {
    if let Some(value) = provided {
        return Ok(value);
    }
    println!("University (pick a number or type your own):");
    for (i, u) in validation::UNIVERSITIES.iter().enumerate() {
        println!("  [{}] {}", i + 1, u);
    }
    let answer = prompter.ask("University", None)?;
    if let Ok(index) = answer.parse::<usize>() {
        if index >= 1 && index <= validation::UNIVERSITIES.len() {
            return Ok(validation::UNIVERSITIES[index - 1].to_string());
        }
    }
    Ok(answer)
}

fn ask_nationality(prompter: &mut Prompter, provided: Option<String>) -> Result<Nationality> {
    let mut answer = provided;
    loop {
        let raw = prompter.ask("Nationality (korean/foreigner)", answer.take())?;
        if let Some(n) = Nationality::from_str(&raw) {
            return Ok(n);
        }
        println!("Please answer 'korean' or 'foreigner'.");
    }
}

pub fn cmd_logout(ctx: &mut Context) -> Result<bool> {
    let backend = ctx.store.backend_name();
    match ctx.store.logout() {
        Ok(()) => {
            ctx.audit.borrow_mut().logout(backend)?;
            println!("{}", messages::signed_out(ctx.locale()));
            Ok(true)
        }
        Err(err) => {
            report_error(ctx, &err);
            Ok(false)
        }
    }
}

pub fn cmd_whoami(ctx: &Context) -> Result<bool> {
    let Some(user) = ctx.store.user() else {
        println!("{}", messages::not_signed_in(ctx.locale()));
        return Ok(false);
    };
    println!("Email:       {}", user.email);
    println!("Name:        {}", user.name);
    println!("University:  {}", user.university);
    println!("Nationality: {}", user.nationality.as_str());
    println!("Major:       {} (year {})", user.major, user.year);
    println!("Joined:      {}", user.joined_date);
    if !user.bio.is_empty() {
        println!("Bio:         {}", user.bio);
    }
    println!("Backend:     {}", ctx.store.backend_name());
    Ok(true)
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_profile(
    ctx: &mut Context,
    name: Option<String>,
    university: Option<String>,
    nationality: Option<String>,
    major: Option<String>,
    year: Option<u32>,
    bio: Option<String>,
    avatar: Option<String>,
) -> Result<bool> {
    let nationality = match nationality {
        Some(raw) => match Nationality::from_str(&raw) {
            Some(n) => Some(n),
            None => {
                eprintln!("Unknown nationality: {}. Use korean or foreigner.", raw);
                return Ok(false);
            }
        },
        None => None,
    };

    let update = ProfileUpdate {
        name,
        university,
        nationality,
        major,
        year,
        bio,
        profile_image: avatar,
    };
    if update.is_empty() {
        println!("Nothing to update. Pass at least one of --name, --university, --nationality, --major, --year, --bio, --avatar.");
        return Ok(false);
    }

    let backend = ctx.store.backend_name();
    match ctx.store.update_profile(&update) {
        Ok(true) => {
            ctx.audit
                .borrow_mut()
                .profile_updated(backend, &update.touched_fields())?;
            println!("{}", messages::profile_updated(ctx.locale()));
            Ok(true)
        }
        Ok(false) => {
            println!("{}", messages::not_signed_in(ctx.locale()));
            Ok(false)
        }
        Err(err) => {
            report_error(ctx, &err);
            Ok(false)
        }
    }
}

pub fn cmd_feed(
    ctx: &Context,
    what: &str,
    category: Option<String>,
    visa_sponsorship: Option<bool>,
) -> Result<bool> {
    let client = FeedClient::new(&ctx.config.remote.base_url, ctx.config.remote.timeout_ms);
    // The dashboard filters by the signed-in user's nationality when there is
    // one; anonymous visitors see everything.
    let nationality = ctx.store.user().map(|u| u.nationality);
    let locale = ctx.locale();

    match what {
        "events" => {
            let resp = client.events(nationality, category.as_deref())?;
            println!("Events ({}):", resp.total);
            for event in &resp.events {
                println!(
                    "  [{}] {} @ {} ({})",
                    event.date,
                    event.title(locale),
                    event.location(locale),
                    event.organizer
                );
            }
        }
        "jobs" => {
            let resp = client.jobs(nationality, visa_sponsorship)?;
            println!("Jobs ({}):", resp.total);
            for job in &resp.jobs {
                print_job(job, locale);
            }
        }
        _ => {
            let all = client.all(nationality)?;
            println!("Events ({}):", all.total_events);
            for event in &all.events {
                println!(
                    "  [{}] {} @ {}",
                    event.date,
                    event.title(locale),
                    event.location(locale)
                );
            }
            println!("Jobs ({}):", all.total_jobs);
            for job in &all.jobs {
                print_job(job, locale);
            }
        }
    }
    Ok(true)
}

fn print_job(job: &crate::feed::Job, locale: Locale) {
    let visa = if job.visa_sponsorship { " [visa]" } else { "" };
    println!(
        "  {} - {} | {} | due {}{}",
        job.company(locale),
        job.title(locale),
        job.salary,
        job.deadline,
        visa
    );
}
