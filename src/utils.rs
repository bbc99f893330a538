use colored::*;
use crate::device::Device;

/// `gadb app.apk` means `install -r app.apk`.
/// Only a lone argument is rewritten; anything longer is already a command.
pub fn expand_apk_shortcut(args: Vec<String>) -> Vec<String> {
    match args.as_slice() {
        [only] if only.ends_with(".apk") => {
            vec!["install".to_string(), "-r".to_string(), only.clone()]
        }
        _ => args,
    }
}

/// Rebuilds the input line from process arguments, single-space separated,
/// so it goes through the same parser as an interactive line.
pub fn join_args(args: &[String]) -> String {
    args.join(" ")
}

/// Numbered device list, 1-based, with `*` marking the current device.
pub fn format_device_list(devices: &[Device], current: Option<&Device>) -> String {
    let mut out = String::new();
    for (i, d) in devices.iter().enumerate() {
        let marker = if current.is_some_and(|c| c.same_as(d)) {
            "*".green().bold().to_string()
        } else {
            " ".to_string()
        };
        out.push_str(&format!("{} [{}] {}\n", marker, i + 1, d));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_apk_shortcut() {
        assert_eq!(
            expand_apk_shortcut(strings(&["build/app-debug.apk"])),
            strings(&["install", "-r", "build/app-debug.apk"])
        );
    }

    #[test]
    fn test_apk_shortcut_leaves_commands_alone() {
        let cmd = strings(&["install", "app.apk"]);
        assert_eq!(expand_apk_shortcut(cmd.clone()), cmd);
        assert_eq!(expand_apk_shortcut(strings(&["devices"])), strings(&["devices"]));
        assert!(expand_apk_shortcut(Vec::new()).is_empty());
    }

    #[test]
    fn test_join_args() {
        assert_eq!(join_args(&strings(&["logcat", "-d", ">", "out.txt"])), "logcat -d > out.txt");
    }

    #[test]
    fn test_device_list_marks_current() {
        colored::control::set_override(false);
        let devices = vec![Device::new("A"), Device::new("B").with_model("Pixel_7")];
        let listing = format_device_list(&devices, Some(&Device::new("B")));
        assert_eq!(listing, "  [1] A\n* [2] B (Pixel_7)\n");
    }
}
