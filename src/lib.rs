// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::application::{
    Authenticator, DeleteOutcome, NoteDeleter, NoteEditor, NoteLister, NoteRepository, NoteViewer,
};
use crate::cli::args::{Args, Command};
use crate::cli::prompt;
use crate::constants::{LOGIN_PATH, ROOT_PATH};
use crate::domain::route::unauthenticated_route;
use crate::domain::{
    AttachmentFile, ConfirmationForm, Location, LoginForm, NoteForm, Route, RouteDecision, Router,
    SignupForm,
};
use crate::infrastructure::config::session_path;
use crate::infrastructure::{
    BrowserRenderer, Config, FileSessionStore, HttpAttachmentStore, HttpIdentityProvider,
    HttpNoteRepository,
};
use crate::ports::{HtmlPresenter, TextPresenter};

pub async fn run(args: Args) -> Result<()> {
    debug!(config = ?args.config, verbose = args.verbose, "Starting scratch");

    let config = Config::resolve(args.config.as_deref())?;
    debug!(?config, "Resolved configuration");

    let mut app = App::new(config)?;
    app.auth.bootstrap().await?;

    app.execute(args.command).await
}

/// The client's top level: the lifted authentication state plus the views.
pub struct App {
    config: Config,
    auth: Authenticator<HttpIdentityProvider, FileSessionStore>,
    router: Router,
    presenter: TextPresenter,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let provider = HttpIdentityProvider::new(&config.endpoints.identity_url);
        let store = FileSessionStore::new(session_path()?);
        Ok(Self {
            config,
            auth: Authenticator::new(provider, store),
            router: Router::new(),
            presenter: TextPresenter::new(),
        })
    }

    pub async fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Signup { email, password } => self.signup(email, password).await,
            Command::Confirm {
                email,
                code,
                password,
            } => self.confirm(email, code, password).await,
            Command::Resend { email } => {
                self.auth.resend(&email).await?;
                println!("A new confirmation code was sent to {email}.");
                Ok(())
            }
            Command::Login {
                email,
                password,
                location,
            } => self.login(email, password, location.as_deref()).await,
            Command::Logout => {
                self.auth.logout().await?;
                println!("Signed out.\nContinue at: {LOGIN_PATH}");
                Ok(())
            }
            Command::List => self.home().await,
            Command::New { content, attach } => {
                self.require(&Location::new("/notes/new", ""))?;
                self.create(content, attach.as_deref()).await
            }
            Command::Show {
                note_id,
                json,
                browser,
            } => {
                self.require(&note_location(&note_id))?;
                self.show(&note_id, json, browser).await
            }
            Command::Edit {
                note_id,
                content,
                attach,
            } => {
                self.require(&note_location(&note_id))?;
                self.edit(&note_id, content, attach.as_deref()).await
            }
            Command::Delete { note_id, yes } => {
                self.require(&note_location(&note_id))?;
                self.delete(&note_id, yes).await
            }
            Command::Open { path } => self.open(&path).await,
        }
    }

    /// Applies the route guard for a protected view, failing with the login
    /// location when the user is signed out.
    fn require(&self, location: &Location) -> Result<()> {
        let navigation = self.router.navigate(self.auth.is_authenticated(), location);
        match navigation.decision {
            RouteDecision::Render => Ok(()),
            RouteDecision::Redirect(target) => {
                bail!("Not signed in. Sign in, then continue at: {target}")
            }
        }
    }

    /// For login and signup: `Some(target)` when the user is already signed in.
    fn already_signed_in(&self, location: &Location) -> Option<String> {
        match self.router.navigate(self.auth.is_authenticated(), location).decision {
            RouteDecision::Render => None,
            RouteDecision::Redirect(target) => Some(target),
        }
    }

    async fn signup(&mut self, email: String, password: Option<String>) -> Result<()> {
        if let Some(target) = self.already_signed_in(&Location::new("/signup", "")) {
            println!("Already signed in.\nContinue at: {target}");
            return Ok(());
        }
        let (password, confirmation) = prompt::new_password(password)?;
        let mut form = SignupForm::new(email, password, confirmation);
        let user = self.auth.signup(&mut form).await?;
        println!(
            "Please check your email for the code.\nThen run: scratch confirm {} <CODE>",
            user.username
        );
        Ok(())
    }

    async fn confirm(&mut self, email: String, code: String, password: Option<String>) -> Result<()> {
        if let Some(target) = self.already_signed_in(&Location::new("/signup", "")) {
            println!("Already signed in.\nContinue at: {target}");
            return Ok(());
        }
        let password = prompt::password(password)?;
        let mut form = ConfirmationForm::new(email, code);
        self.auth.confirm(&mut form, &password).await?;
        println!("Signed in as {}.\nContinue at: {ROOT_PATH}", form.email);
        Ok(())
    }

    async fn login(&mut self, email: String, password: Option<String>, location: Option<&str>) -> Result<()> {
        let location = Location::parse(location.unwrap_or(LOGIN_PATH))
            .context("Invalid login location")?;
        if Route::resolve(&location.pathname) != Route::Login {
            bail!("Not a login location: {location}");
        }
        if let Some(target) = self.already_signed_in(&location) {
            println!("Already signed in.\nContinue at: {target}");
            return Ok(());
        }

        let password = prompt::password(password)?;
        let mut form = LoginForm::new(email, password);
        self.auth.login(&mut form).await?;

        let target = match unauthenticated_route(true, &location) {
            RouteDecision::Redirect(target) => target,
            RouteDecision::Render => ROOT_PATH.to_string(),
        };
        println!("Signed in as {}.\nContinue at: {target}", form.email);
        Ok(())
    }

    async fn token(&mut self) -> Result<String> {
        Ok(self.auth.access_token().await?)
    }

    async fn notes(&mut self) -> Result<HttpNoteRepository> {
        let token = self.token().await?;
        Ok(HttpNoteRepository::new(&self.config.endpoints.api_url, token))
    }

    async fn attachments(&mut self) -> Result<HttpAttachmentStore> {
        let token = self.token().await?;
        Ok(HttpAttachmentStore::new(&self.config.endpoints.storage_url, token))
    }

    async fn home(&mut self) -> Result<()> {
        if !self.auth.is_authenticated() {
            print!("{}", self.presenter.render_lander());
            return Ok(());
        }
        let home = NoteLister::new(self.notes().await?).home(true).await?;
        print!("{}", self.presenter.render_home(&home));
        Ok(())
    }

    async fn create(&mut self, content: String, attach: Option<&Path>) -> Result<()> {
        let file = attach.map(read_attachment).transpose()?;
        let mut form = NoteForm::new(content, file);
        let mut editor = NoteEditor::new(
            self.notes().await?,
            self.attachments().await?,
            self.config.limits.max_attachment_size,
        );
        let note = editor.create(&mut form).await?;
        println!("Created note {}.\nContinue at: {ROOT_PATH}", note.note_id);
        Ok(())
    }

    async fn show(&mut self, note_id: &str, json: bool, browser: bool) -> Result<()> {
        let mut viewer = NoteViewer::new(self.notes().await?, self.attachments().await?);
        info!(note_id, "Viewing note");
        let view = viewer.view_note(note_id).await?;

        if json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else if browser {
            let html = HtmlPresenter::new().render(&view);
            let mut renderer = BrowserRenderer::new();
            let path = renderer.create_temp_file(&html)?;
            renderer.open_in_browser(&path)?;
        } else {
            print!("{}", self.presenter.render_note(&view));
        }
        Ok(())
    }

    async fn edit(&mut self, note_id: &str, content: String, attach: Option<&Path>) -> Result<()> {
        let file = attach.map(read_attachment).transpose()?;
        let mut repository = self.notes().await?;
        let existing = repository.get_note(note_id).await?;

        let mut form = NoteForm::new(content, file);
        let mut editor = NoteEditor::new(
            repository,
            self.attachments().await?,
            self.config.limits.max_attachment_size,
        );
        editor.save(&existing, &mut form).await?;
        println!("Saved note {note_id}.\nContinue at: {ROOT_PATH}");
        Ok(())
    }

    async fn delete(&mut self, note_id: &str, yes: bool) -> Result<()> {
        let mut deleter = NoteDeleter::new(self.notes().await?);
        let outcome = deleter
            .delete_note(note_id, |question| yes || prompt::confirm(question))
            .await?;
        match outcome {
            DeleteOutcome::Deleted => println!("Deleted note {note_id}.\nContinue at: {ROOT_PATH}"),
            DeleteOutcome::Cancelled => println!("Cancelled."),
        }
        Ok(())
    }

    /// Navigates to an in-app location, rendering the view the guards allow.
    async fn open(&mut self, path: &str) -> Result<()> {
        let location = Location::parse(path).with_context(|| format!("Invalid location: {path}"))?;
        let navigation = self.router.navigate(self.auth.is_authenticated(), &location);

        if let RouteDecision::Redirect(target) = navigation.decision {
            println!("Redirect: {target}");
            if Route::resolve(&Location::parse(&target)?.pathname) == Route::Login {
                println!("Sign in with: scratch login <EMAIL> --location '{target}'");
            }
            return Ok(());
        }

        match navigation.route {
            Route::Home => self.home().await,
            Route::Login => {
                println!("Sign in with: scratch login <EMAIL> --location '{location}'");
                Ok(())
            }
            Route::Signup => {
                println!("Create an account with: scratch signup <EMAIL>");
                Ok(())
            }
            Route::NewNote => {
                println!("Create a note with: scratch new <CONTENT> [--attach FILE]");
                Ok(())
            }
            Route::Note(id) => self.show(&id, false, false).await,
            Route::NotFound => bail!("Page not found: {location}"),
        }
    }
}

fn note_location(note_id: &str) -> Location {
    Location::new(format!("/notes/{note_id}"), "")
}

fn read_attachment(path: &Path) -> Result<AttachmentFile> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read attachment {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("Attachment path has no file name")?
        .to_string();
    Ok(AttachmentFile {
        content_type: content_type_for(&name).to_string(),
        name,
        bytes,
    })
}

fn content_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("txt" | "md") => "text/plain",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}
