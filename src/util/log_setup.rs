/// 日誌初始化
use chrono::Local;
use failure::{err_msg, Error};
use log::LevelFilter;

/// 解析日誌等級字串，無法辨識時回傳 `Info`
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse::<LevelFilter>().unwrap_or(LevelFilter::Info)
}

/// 安裝全域 logger：輸出到 stdout，指定 `log_file` 時同時寫檔
pub fn setup_logger(level: &str, log_file: Option<&str>) -> Result<(), Error> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(parse_level(level))
        .chain(std::io::stdout());

    if let Some(path) = log_file {
        let file = fern::log_file(path)
            .map_err(|e| err_msg(format!("無法開啟日誌檔 {}: {}", path, e)))?;
        dispatch = dispatch.chain(file);
    }

    dispatch
        .apply()
        .map_err(|e| err_msg(format!("logger 初始化失敗: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("trace"), LevelFilter::Trace);
        assert_eq!(parse_level("Off"), LevelFilter::Off);
        assert_eq!(parse_level("???"), LevelFilter::Info);
        assert_eq!(parse_level(""), LevelFilter::Info);
    }
}
