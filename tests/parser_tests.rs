use chrono::NaiveDate;
use nginx_log_analyzer::input::{find_latest_log, open_log, select_latest_log};
use nginx_log_analyzer::parser::{extract_request, ParsedRequest};
use nginx_log_analyzer::utils::ParseError;
use pretty_assertions::assert_eq;

const LOG_FILES: [&str; 4] = [
    "nginx-access-ui.log-20170630",
    "nginx-access-ui.log-20170730",
    "nginx-access-ui.log-20180301",
    "nginx-access-ui.log-20180325",
];

#[test]
fn test_select_latest_log_fixture() {
    let (name, date) = select_latest_log(LOG_FILES).unwrap();
    assert_eq!(name, "nginx-access-ui.log-20180325");
    assert_eq!(date, NaiveDate::from_ymd_opt(2018, 3, 25).unwrap());
}

#[test]
fn test_select_latest_log_order_independent() {
    let mut shuffled = LOG_FILES.to_vec();
    shuffled.reverse();
    shuffled.push("README");

    let (name, _) = select_latest_log(shuffled).unwrap();
    assert_eq!(name, "nginx-access-ui.log-20180325");
}

#[test]
fn test_find_latest_log_with_gzip_and_stray_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in LOG_FILES {
        std::fs::write(dir.path().join(name), "").unwrap();
    }
    std::fs::write(dir.path().join("nginx-access-ui.log-20180401.gz"), "").unwrap();
    std::fs::write(dir.path().join("access.log"), "").unwrap();

    let found = find_latest_log(dir.path()).unwrap().unwrap();
    assert_eq!(
        found.path,
        dir.path().join("nginx-access-ui.log-20180401.gz")
    );
    assert_eq!(found.date, NaiveDate::from_ymd_opt(2018, 4, 1).unwrap());
}

#[test]
fn test_extract_each_method() {
    for method in ["GET", "POST", "PUT"] {
        let line = format!(
            r#"1.169.137.128 -  - [29/Jun/2017:03:50:23 +0300] "{method} /api/v2/slot/4705/groups HTTP/1.1" 200 2613 "-" "-" "-" "1498697423-2118016444-4708-9752778" "712e90144abee9" 0.704"#
        );
        let parsed = extract_request(&line, 1).unwrap();
        assert_eq!(
            parsed,
            Some(ParsedRequest {
                url: "/api/v2/slot/4705/groups".to_string(),
                duration: 0.704,
            })
        );
    }
}

#[test]
fn test_extract_unrecognized_method() {
    let line = r#"1.1.1.1 - - [x] "DELETE /api/1 HTTP/1.1" 204 0 "-" "-" 0.010"#;
    assert_eq!(extract_request(line, 1).unwrap(), None);
}

#[test]
fn test_extract_reports_line_number() {
    let line = r#"1.1.1.1 - - [x] "GET /api/1 HTTP/1.1" 200 0 "-" "-" -"#;
    let err = extract_request(line, 42).unwrap_err();
    assert_eq!(
        err,
        ParseError::InvalidDuration {
            line_no: 42,
            token: "-".to_string()
        }
    );
}

#[test]
fn test_open_log_streams_lines_for_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nginx-access-ui.log-20180325");
    std::fs::write(
        &path,
        "GET /a HTTP/1.1 200 0.1\r\nnoise\nPOST /b HTTP/1.1 201 0.2\n",
    )
    .unwrap();

    let parsed: Vec<ParsedRequest> = open_log(&path)
        .unwrap()
        .enumerate()
        .filter_map(|(i, line)| extract_request(&line.unwrap(), i + 1).unwrap())
        .collect();

    let urls: Vec<&str> = parsed.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(urls, vec!["/a", "/b"]);
}
