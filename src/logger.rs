use crate::log::{LogMessage, Severity};
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::fs::{File, OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

/// Global logger instance
static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

const LOG_FILE_MAX_SIZE: u64 = 1024 * 1024; // 1MB
const LOG_FILE_MAX_COUNT: usize = 5;
const LOG_FILE_NAME: &str = "bytebeat.log";

/// File-based log writer with rotation
#[derive(Debug)]
pub struct LogFileWriter {
    log_dir: PathBuf,
    current_file: Option<File>,
    current_size: u64,
}

impl LogFileWriter {
    pub fn new() -> Result<Self, std::io::Error> {
        Self::in_directory(Self::default_log_directory())
    }

    pub fn in_directory(log_dir: PathBuf) -> Result<Self, std::io::Error> {
        create_dir_all(&log_dir)?;
        Ok(LogFileWriter {
            log_dir,
            current_file: None,
            current_size: 0,
        })
    }

    fn default_log_directory() -> PathBuf {
        let mut path = dirs::data_local_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        path.push("bytebeat");
        path.push("logs");
        path
    }

    fn current_log_path(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }

    fn archive_path(&self, index: usize) -> PathBuf {
        self.log_dir.join(format!("{LOG_FILE_NAME}.{index}"))
    }

    fn rotate_logs(&mut self) -> Result<(), std::io::Error> {
        self.current_file = None;

        let oldest = self.archive_path(LOG_FILE_MAX_COUNT - 1);
        if oldest.exists() {
            std::fs::remove_file(&oldest)?;
        }
        for i in (1..LOG_FILE_MAX_COUNT - 1).rev() {
            let old_path = self.archive_path(i);
            if old_path.exists() {
                std::fs::rename(&old_path, self.archive_path(i + 1))?;
            }
        }

        let current_path = self.current_log_path();
        if current_path.exists() {
            std::fs::rename(&current_path, self.archive_path(1))?;
        }

        self.current_size = 0;
        Ok(())
    }

    fn ensure_file_open(&mut self) -> Result<(), std::io::Error> {
        if self.current_file.is_none() {
            let path = self.current_log_path();
            self.current_file = Some(OpenOptions::new().create(true).append(true).open(&path)?);
            if let Ok(metadata) = std::fs::metadata(&path) {
                self.current_size = metadata.len();
            }
        }
        Ok(())
    }

    pub fn write_log(&mut self, log_msg: &LogMessage) -> Result<(), std::io::Error> {
        self.ensure_file_open()?;

        let formatted_log = format!("{log_msg}\n");
        let log_bytes = formatted_log.as_bytes();

        if self.current_size + log_bytes.len() as u64 > LOG_FILE_MAX_SIZE {
            self.rotate_logs()?;
            self.ensure_file_open()?;
        }

        if let Some(file) = self.current_file.as_mut() {
            file.write_all(log_bytes)?;
            file.flush()?;
            self.current_size += log_bytes.len() as u64;
        }

        Ok(())
    }

    pub fn log_file_path(&self) -> PathBuf {
        self.current_log_path()
    }
}

/// Logger operating mode
#[derive(Debug, Clone)]
pub enum LoggerMode {
    /// Logs directly to the terminal, errors on stderr
    Standalone,
    /// Forwards every message over a channel, typically to a host UI
    Embedded(Sender<LogMessage>),
    /// Logs to a rotating file only
    File,
    /// Drops everything
    Silent,
}

pub struct Logger {
    mode: Arc<Mutex<LoggerMode>>,
    file_writer: Arc<Mutex<Option<LogFileWriter>>>,
}

fn open_file_writer() -> Option<LogFileWriter> {
    match LogFileWriter::new() {
        Ok(writer) => Some(writer),
        Err(e) => {
            eprintln!("Failed to create log file writer: {e}");
            None
        }
    }
}

fn print_to_terminal(log_msg: &LogMessage) {
    if log_msg.level.is_error() {
        eprintln!("{log_msg}");
        let _ = std::io::stderr().flush();
    } else {
        println!("{log_msg}");
        let _ = std::io::stdout().flush();
    }
}

impl Logger {
    fn with_mode(mode: LoggerMode, file_writer: Option<LogFileWriter>) -> Self {
        Logger {
            mode: Arc::new(Mutex::new(mode)),
            file_writer: Arc::new(Mutex::new(file_writer)),
        }
    }

    pub fn new_standalone() -> Self {
        Self::with_mode(LoggerMode::Standalone, None)
    }

    /// Forwards every message to `sender`, for hosts that show logs in their
    /// own UI.
    pub fn new_embedded(sender: Sender<LogMessage>) -> Self {
        Self::with_mode(LoggerMode::Embedded(sender), None)
    }

    /// File mode writing into `writer` instead of the default log directory.
    pub fn new_file_with(writer: LogFileWriter) -> Self {
        Self::with_mode(LoggerMode::File, Some(writer))
    }

    fn set_mode(&self, new_mode: LoggerMode) {
        if let Ok(mut mode) = self.mode.lock() {
            *mode = new_mode;
        }
    }

    pub fn set_standalone_mode(&self) {
        self.set_mode(LoggerMode::Standalone);
    }

    pub fn set_silent_mode(&self) {
        self.set_mode(LoggerMode::Silent);
    }

    pub fn set_file_mode(&self) {
        self.set_mode(LoggerMode::File);
        if let Ok(mut file_writer) = self.file_writer.lock() {
            if file_writer.is_none() {
                *file_writer = open_file_writer();
            }
        }
    }

    pub fn mode(&self) -> Option<LoggerMode> {
        self.mode.lock().ok().map(|mode| mode.clone())
    }

    /// Path of the file being written, once file mode has been entered.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.file_writer
            .lock()
            .ok()
            .and_then(|writer| writer.as_ref().map(|w| w.log_file_path()))
    }

    pub fn log(&self, level: Severity, msg: String) {
        let log_msg = LogMessage::new(level, msg);
        let Ok(mode) = self.mode.lock() else {
            return;
        };
        match &*mode {
            LoggerMode::Standalone => print_to_terminal(&log_msg),
            LoggerMode::Embedded(sender) => {
                if sender.try_send(log_msg.clone()).is_err() {
                    // Fallback to terminal if channel is full/closed
                    eprintln!("Logger channel error: {log_msg}");
                }
            }
            LoggerMode::File => {
                if let Ok(mut file_writer) = self.file_writer.lock() {
                    if let Some(writer) = file_writer.as_mut() {
                        if let Err(e) = writer.write_log(&log_msg) {
                            eprintln!("Failed to write to log file: {e}");
                        }
                    }
                }
            }
            LoggerMode::Silent => {}
        }
    }

    pub fn debug(&self, msg: String) {
        self.log(Severity::Debug, msg);
    }

    pub fn info(&self, msg: String) {
        self.log(Severity::Info, msg);
    }

    pub fn warn(&self, msg: String) {
        self.log(Severity::Warn, msg);
    }

    pub fn error(&self, msg: String) {
        self.log(Severity::Error, msg);
    }

    pub fn fatal(&self, msg: String) {
        self.log(Severity::Fatal, msg);
    }
}

/// Initialize the global logger in standalone mode
pub fn init_standalone() {
    let _ = GLOBAL_LOGGER.set(Logger::new_standalone());
}

/// Create a logging channel pair
pub fn create_log_channel() -> (Sender<LogMessage>, Receiver<LogMessage>) {
    unbounded()
}

/// Get the global logger instance
pub fn get_logger() -> &'static Logger {
    GLOBAL_LOGGER.get_or_init(Logger::new_standalone)
}

pub fn set_standalone_mode() {
    get_logger().set_standalone_mode();
}

pub fn set_file_mode() {
    get_logger().set_file_mode();
}

pub fn set_silent_mode() {
    get_logger().set_silent_mode();
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logger::get_logger().debug(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::get_logger().info(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::get_logger().warn(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logger::get_logger().error(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_fatal {
    ($($arg:tt)*) => {
        $crate::logger::get_logger().fatal(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_mode_forwards_messages() {
        let (tx, rx) = create_log_channel();
        let logger = Logger::new_embedded(tx);
        logger.warn("queue full".to_owned());
        logger.debug("detail".to_owned());
        assert_eq!(
            rx.try_recv().unwrap(),
            LogMessage::new(Severity::Warn, "queue full".to_owned())
        );
        assert_eq!(rx.try_recv().unwrap().level, Severity::Debug);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn silent_mode_drops_everything() {
        let (tx, rx) = create_log_channel();
        let logger = Logger::new_embedded(tx);
        logger.set_silent_mode();
        logger.error("lost".to_owned());
        assert!(rx.try_recv().is_err());
        assert!(matches!(logger.mode(), Some(LoggerMode::Silent)));
    }

    #[test]
    fn file_mode_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LogFileWriter::in_directory(dir.path().to_path_buf()).unwrap();
        let logger = Logger::new_file_with(writer);
        logger.info("first".to_owned());
        logger.error("second".to_owned());
        let path = logger.log_file_path().unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents, "[INFO] first\n[ERROR] second\n");
    }

    #[test]
    fn rotation_archives_the_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = LogFileWriter::in_directory(dir.path().to_path_buf()).unwrap();
        let big = LogMessage::new(Severity::Info, "x".repeat(600 * 1024));
        writer.write_log(&big).unwrap();
        writer.write_log(&big).unwrap();
        assert!(dir.path().join("bytebeat.log.1").exists());
        let current = std::fs::metadata(writer.log_file_path()).unwrap().len();
        assert!(current < LOG_FILE_MAX_SIZE);
    }
}
