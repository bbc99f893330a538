use colored::*;
use crate::session::Session;

pub fn print_welcome(session: &Session) {
    println!();
    println!("  {}", "GADB - Fast ADB Device Switcher".green().bold());
    println!();
    print_status(session);
    println!("Commands:");
    println!("  <number>       - Switch to device (1, 2, 3...)");
    println!("  0              - Show device list");
    println!("  :sh            - Local shell mode on the current device");
    println!("  help           - Show detailed help");
    println!("  <adb cmd>      - Execute adb command on current device");
    println!("  q, exit        - Quit");
    println!();
}

pub fn print_status(session: &Session) {
    match session.current() {
        Some(d) => println!("  Current: {}", d.to_string().cyan()),
        None => println!("  {}", "No device selected".yellow()),
    }
    println!("  Devices: {} connected", session.devices().len());
    println!();
}

pub fn print_help() {
    println!();
    println!("  {}", "GADB - Fast ADB Device Switcher".green().bold());
    println!();
    println!("{}", "USAGE:".bold());
    println!("  gadb              - Start interactive REPL mode");
    println!("  gadb <command>    - Execute adb command on selected device");
    println!("  gadb <file.apk>   - Install (or reinstall) an APK");
    println!("  gadb devices      - List all connected devices");
    println!();
    println!("{}", "REPL COMMANDS:".bold());
    println!("  help, h, ?       - Show this help message");
    println!("  <number>, :<n>   - Switch to device (1, 2, 3...)");
    println!("  0                - Show device list");
    println!("  Enter (empty)    - Show current device status");
    println!("  :sh              - Local shell mode (exit to return)");
    println!("  q, exit, quit    - Quit REPL");
    println!();
    println!("{}", "ADB COMMANDS (passed through):".bold());
    println!("  shell <cmd>      - Execute shell command");
    println!("  shell            - Enter interactive shell");
    println!("  logcat [args]    - View logcat output");
    println!("  install <apk>    - Install APK file");
    println!("  uninstall <pkg>  - Uninstall package");
    println!("  push <src> <dst> - Push file to device");
    println!("  pull <src> <dst> - Pull file from device");
    println!("  ...any adb cmd   - All other adb commands work too");
    println!();
    println!("{}", "REDIRECTION & PIPELINE:".bold());
    println!("  cmd > file       - Redirect output to file (overwrite)");
    println!("  cmd >> file      - Append output to file");
    println!("  cmd | grep x     - Pipe output to another command");
    println!();
    println!("{}", "EXAMPLES:".bold());
    println!("  shell ps                    - List processes");
    println!("  shell ps | grep com.android - Filter processes");
    println!("  logcat -d > log.txt         - Save logcat to file");
    println!("  install app.apk             - Install app");
    println!();
}
