use anyhow::Result;
use log::debug;
use std::io::{self, BufRead, Write};
use crate::cmdline::parse_command;
use crate::device::{DeviceSource, choose_targets};
use crate::handlers::devices::handle_devices;
use crate::router::Router;
use crate::utils::{expand_apk_shortcut, join_args};

/// One command from process arguments, same dispatch as the REPL.
pub fn run_single(args: Vec<String>, source: &dyn DeviceSource, router: &Router) -> Result<i32> {
    let stdin = io::stdin();
    run_single_with(args, source, router, &mut stdin.lock(), &mut io::stdout())
}

pub fn run_single_with<R: BufRead, W: Write>(
    args: Vec<String>,
    source: &dyn DeviceSource,
    router: &Router,
    input: &mut R,
    out: &mut W,
) -> Result<i32> {
    if args.first().is_some_and(|a| a == "devices") {
        return handle_devices(source);
    }

    let args = expand_apk_shortcut(args);
    let parsed = parse_command(&join_args(&args));
    debug!("Parsed: {:?}", parsed);

    let devices = source.scan()?;
    let Some(targets) = choose_targets(&devices, input, out)? else {
        writeln!(out, "exit")?;
        return Ok(0);
    };
    router.run(&targets, &parsed)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adb::Adb;
    use crate::device::Device;
    use crate::error::GadbError;
    use std::io::Cursor;

    struct FixedSource(Vec<Device>);

    impl DeviceSource for FixedSource {
        fn scan(&self) -> Result<Vec<Device>> {
            Ok(self.0.clone())
        }
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_device_is_an_error() {
        let router = Router::new(Adb::new("adb", vec![]));
        let mut out = Vec::new();
        let err = run_single_with(
            strings(&["shell", "ps"]),
            &FixedSource(Vec::new()),
            &router,
            &mut Cursor::new(&b""[..]),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<GadbError>(), Some(GadbError::NoDeviceFound)));
    }

    #[test]
    fn test_devices_keyword_exits_zero() {
        let router = Router::new(Adb::new("adb", vec![]));
        let mut out = Vec::new();
        let code = run_single_with(
            strings(&["devices", "-l"]),
            &FixedSource(Vec::new()),
            &router,
            &mut Cursor::new(&b""[..]),
            &mut out,
        )
        .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_quit_at_menu() {
        let router = Router::new(Adb::new("adb", vec![]));
        let mut out = Vec::new();
        let code = run_single_with(
            strings(&["shell", "ps"]),
            &FixedSource(vec![Device::new("A"), Device::new("B")]),
            &router,
            &mut Cursor::new(&b"q\n"[..]),
            &mut out,
        )
        .unwrap();
        assert_eq!(code, 0);
        assert!(String::from_utf8(out).unwrap().ends_with("exit\n"));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use tempfile::TempDir;

        fn echo_router() -> Router {
            Router::new(Adb::new(
                "sh",
                vec!["-c".to_string(), r#"printf '%s\n' "$*""#.to_string(), "adb".to_string()],
            ))
        }

        #[test]
        fn test_apk_shortcut_and_redirect_on_single_device() {
            let dir = TempDir::new().unwrap();
            let target = dir.path().join("out.txt");
            let target_arg = target.to_string_lossy().into_owned();

            let mut out = Vec::new();
            let code = run_single_with(
                strings(&["logcat", "-d", ">", &target_arg]),
                &FixedSource(vec![Device::new("SER1")]),
                &echo_router(),
                &mut Cursor::new(&b""[..]),
                &mut out,
            )
            .unwrap();
            assert_eq!(code, 0);
            assert_eq!(fs::read_to_string(&target).unwrap(), "-s SER1 logcat -d\n");
        }

        #[test]
        fn test_all_devices_in_selection_order() {
            let dir = TempDir::new().unwrap();
            let target = dir.path().join("all.txt");
            let target_arg = target.to_string_lossy().into_owned();

            let mut out = Vec::new();
            run_single_with(
                strings(&["app.apk", ">>", &target_arg]),
                &FixedSource(vec![Device::new("A"), Device::new("B")]),
                &echo_router(),
                &mut Cursor::new(&b"all\n"[..]),
                &mut out,
            )
            .unwrap();
            // More than one word, so no apk rewrite
            assert_eq!(fs::read_to_string(&target).unwrap(), "-s A app.apk\n-s B app.apk\n");
        }

        #[test]
        fn test_lone_apk_installs() {
            let dir = TempDir::new().unwrap();
            let log = dir.path().join("argv.txt");
            let script = format!(r#"printf '%s\n' "$*" > '{}'"#, log.display());
            let router = Router::new(Adb::new("sh", vec!["-c".to_string(), script, "adb".to_string()]));

            let mut out = Vec::new();
            run_single_with(
                strings(&["app-debug.apk"]),
                &FixedSource(vec![Device::new("SER1")]),
                &router,
                &mut Cursor::new(&b""[..]),
                &mut out,
            )
            .unwrap();
            assert_eq!(fs::read_to_string(&log).unwrap(), "-s SER1 install -r app-debug.apk\n");
        }
    }
}
