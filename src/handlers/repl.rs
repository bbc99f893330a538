use anyhow::Result;
use colored::*;
use log::debug;
use std::io;
use crate::cmdline::parse_command;
use crate::completion::CompletionMode;
use crate::config::GadbConfig;
use crate::device::select::prompt_selection;
use crate::device::{Choice, DeviceSource};
use crate::editor::{Input, LineEditor};
use crate::error::GadbError;
use crate::handlers::devices::print_device_list;
use crate::handlers::help::{print_help, print_status, print_welcome};
use crate::handlers::shell_mode;
use crate::router::Router;
use crate::session::Session;

/// What one REPL line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Status,
    Help,
    Exit,
    /// `N` or `:N`; 0 lists the devices, 1.. selects one
    Switch(i64),
    LocalShell,
    PassThrough,
}

pub fn classify(line: &str) -> ReplCommand {
    match line {
        "" => ReplCommand::Status,
        "help" | "h" | "?" => ReplCommand::Help,
        "q" | "exit" | "quit" => ReplCommand::Exit,
        ":sh" => ReplCommand::LocalShell,
        _ => {
            let number = line.strip_prefix(':').unwrap_or(line);
            match number.parse::<i64>() {
                Ok(n) => ReplCommand::Switch(n),
                Err(_) => ReplCommand::PassThrough,
            }
        }
    }
}

pub struct Repl<'a> {
    session: Session,
    source: &'a dyn DeviceSource,
    router: &'a Router,
    config: &'a GadbConfig,
}

impl<'a> Repl<'a> {
    pub fn new(source: &'a dyn DeviceSource, router: &'a Router, config: &'a GadbConfig) -> Self {
        Self {
            session: Session::with_history_limit(config.history_limit),
            source,
            router,
            config,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs one trimmed input line. Errors are for the caller to print; the session goes on.
    pub fn handle_line(&mut self, line: &str) -> Result<()> {
        match classify(line) {
            ReplCommand::Status => {
                self.session.refresh(self.source)?;
                print_status(&self.session);
            }
            ReplCommand::Help => print_help(),
            ReplCommand::Exit => {
                println!("Exiting...");
                self.session.stop(0);
            }
            ReplCommand::Switch(n) => self.switch_device(n)?,
            ReplCommand::LocalShell => {
                let device = self.session.require_device()?.clone();
                shell_mode::run(&device, self.router, self.config)?;
            }
            ReplCommand::PassThrough => {
                let device = self.session.require_device()?.clone();
                let parsed = parse_command(line);
                debug!("Parsed: {:?}", parsed);
                self.router.run(&[device], &parsed)?;
            }
        }
        Ok(())
    }

    fn switch_device(&mut self, n: i64) -> Result<()> {
        self.session.refresh(self.source)?;
        let devices = self.session.devices();

        if devices.is_empty() {
            println!("{}", "No devices found".yellow());
            return Ok(());
        }
        if n == 0 {
            print_device_list(devices, self.session.current());
            return Ok(());
        }

        match usize::try_from(n) {
            Ok(idx) if (1..=devices.len()).contains(&idx) => {
                let device = self.session.select(idx - 1)?;
                println!("Switched to: {}", device.to_string().cyan());
            }
            _ => {
                println!("{}", GadbError::InvalidDeviceIndex(n).to_string().red());
                print_device_list(self.session.devices(), self.session.current());
            }
        }
        Ok(())
    }

    /// First scan plus the initial pick. Returns false when there is nothing to work with.
    fn start(&mut self) -> Result<bool> {
        let devices = self.source.scan()?;
        self.session.start(devices);

        if self.session.devices().is_empty() {
            println!("No devices found. Exiting...");
            return Ok(false);
        }

        if self.session.current().is_none() {
            let stdin = io::stdin();
            let choice = prompt_selection(self.session.devices(), &mut stdin.lock(), &mut io::stdout())?;
            match choice {
                Choice::Quit => {
                    println!("No device selected. Exiting...");
                    return Ok(false);
                }
                // The REPL works on one device at a time; "all" starts on the first
                Choice::All => {
                    self.session.select(0)?;
                }
                Choice::One(idx) => {
                    self.session.select(idx)?;
                }
            }
        }
        Ok(true)
    }

    pub fn run(mut self) -> Result<i32> {
        if !self.start()? {
            return Ok(0);
        }
        print_welcome(&self.session);

        let mut editor = LineEditor::new(
            CompletionMode::Repl,
            self.config.history_file.clone(),
            self.config.history_limit,
        )?;

        while self.session.is_running() {
            match editor.read_line(&self.session.prompt())? {
                Input::Line(raw) => {
                    let line = raw.trim();
                    // The session decides what is worth keeping; the editor persists it
                    if self.session.add_history(line) {
                        editor.remember(line);
                    }
                    if let Err(e) = self.handle_line(line) {
                        println!("{} {:#}", "Error:".red(), e);
                    }
                }
                Input::Interrupted => continue,
                Input::Eof => {
                    println!("Exiting...");
                    self.session.stop(0);
                }
            }
        }
        Ok(self.session.exit_code())
    }
}

pub fn run_repl(source: &dyn DeviceSource, router: &Router, config: &GadbConfig) -> Result<i32> {
    Repl::new(source, router, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adb::Adb;
    use crate::device::Device;
    use crate::session::SessionState;

    struct FixedSource(Vec<Device>);

    impl DeviceSource for FixedSource {
        fn scan(&self) -> Result<Vec<Device>> {
            Ok(self.0.clone())
        }
    }

    fn devs(serials: &[&str]) -> Vec<Device> {
        serials.iter().map(|s| Device::new(*s)).collect()
    }

    fn started<'a>(source: &'a FixedSource, router: &'a Router, config: &'a GadbConfig) -> Repl<'a> {
        let mut repl = Repl::new(source, router, config);
        repl.session.start(source.0.clone());
        repl
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(""), ReplCommand::Status);
        assert_eq!(classify("?"), ReplCommand::Help);
        assert_eq!(classify("h"), ReplCommand::Help);
        assert_eq!(classify("quit"), ReplCommand::Exit);
        assert_eq!(classify("2"), ReplCommand::Switch(2));
        assert_eq!(classify(":3"), ReplCommand::Switch(3));
        assert_eq!(classify("0"), ReplCommand::Switch(0));
        assert_eq!(classify("-1"), ReplCommand::Switch(-1));
        assert_eq!(classify(":sh"), ReplCommand::LocalShell);
        assert_eq!(classify(":x"), ReplCommand::PassThrough);
        assert_eq!(classify("shell ps"), ReplCommand::PassThrough);
        assert_eq!(classify("help me"), ReplCommand::PassThrough);
    }

    #[test]
    fn test_no_devices_exits_cleanly() {
        let source = FixedSource(Vec::new());
        let router = Router::new(Adb::new("adb", vec![]));
        let config = GadbConfig::default();
        let code = Repl::new(&source, &router, &config).run().unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_session_uses_configured_history_limit() {
        let source = FixedSource(devs(&["A"]));
        let router = Router::new(Adb::new("adb", vec![]));
        let config = GadbConfig {
            history_limit: 2,
            ..GadbConfig::default()
        };
        let mut repl = Repl::new(&source, &router, &config);
        for line in ["help", "0", "exit"] {
            repl.session.add_history(line);
        }
        assert_eq!(repl.session().history(), ["0", "exit"]);
    }

    #[test]
    fn test_exit_stops_with_zero() {
        let source = FixedSource(devs(&["A"]));
        let router = Router::new(Adb::new("adb", vec![]));
        let config = GadbConfig::default();
        let mut repl = started(&source, &router, &config);

        repl.handle_line("exit").unwrap();
        assert_eq!(repl.session().state(), SessionState::Stopped);
        assert_eq!(repl.session().exit_code(), 0);
    }

    #[test]
    fn test_switch_by_number() {
        let source = FixedSource(devs(&["A", "B", "C"]));
        let router = Router::new(Adb::new("adb", vec![]));
        let config = GadbConfig::default();
        let mut repl = started(&source, &router, &config);
        assert!(repl.session().current().is_none());

        repl.handle_line("2").unwrap();
        assert_eq!(repl.session().current().unwrap().serial, "B");
        repl.handle_line(":3").unwrap();
        assert_eq!(repl.session().current().unwrap().serial, "C");

        // Out of range keeps the selection
        repl.handle_line("9").unwrap();
        repl.handle_line("-1").unwrap();
        repl.handle_line("0").unwrap();
        assert_eq!(repl.session().current().unwrap().serial, "C");
    }

    #[test]
    fn test_pass_through_needs_device() {
        let source = FixedSource(devs(&["A", "B"]));
        let router = Router::new(Adb::new("adb", vec![]));
        let config = GadbConfig::default();
        let mut repl = started(&source, &router, &config);

        let err = repl.handle_line("shell ps").unwrap_err();
        assert!(matches!(err.downcast_ref::<GadbError>(), Some(GadbError::NoDeviceSelected)));
        assert!(repl.session().is_running());
    }

    #[test]
    fn test_status_refreshes() {
        let source = FixedSource(devs(&["ONLY"]));
        let router = Router::new(Adb::new("adb", vec![]));
        let config = GadbConfig::default();
        let mut repl = Repl::new(&source, &router, &config);
        repl.session.start(Vec::new());
        assert!(repl.session().current().is_none());

        repl.handle_line("").unwrap();
        assert_eq!(repl.session().current().unwrap().serial, "ONLY");
    }

    #[cfg(unix)]
    #[test]
    fn test_pass_through_routes_to_current_device() {
        use std::fs;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("ps.txt");
        let source = FixedSource(devs(&["SER9"]));
        let router = Router::new(Adb::new(
            "sh",
            vec!["-c".to_string(), r#"printf '%s\n' "$*""#.to_string(), "adb".to_string()],
        ));
        let config = GadbConfig::default();
        let mut repl = started(&source, &router, &config);

        repl.handle_line(&format!("shell ps > {}", target.display())).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "-s SER9 shell ps\n");
    }
}
