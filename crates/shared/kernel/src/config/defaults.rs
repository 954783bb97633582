//! Compiled-in defaults, the lowest configuration layer.

use config::Value;

const PLACEHOLDER_PAGE: &str = "<h1>To set content for this page update your configuration file</h1>";

pub(crate) fn entries() -> Vec<(&'static str, Value)> {
    vec![
        ("config_url", "http://config.url".into()),
        ("censusid", "noid".into()),
        ("title_short", "Census".into()),
        ("display_year", 2014_i64.into()),
        ("submit_year", 2014_i64.into()),
        ("site_url", "http://localhost:5000".into()),
        ("approve_first_submission", "FALSE".into()),
        ("reviewers", "".into()),
        (super::LOCALES_KEY, vec!["en"].into()),
        ("field_separator", ",".into()),
        ("disqus_shortname", "opendatacensus".into()),
        ("about_page", PLACEHOLDER_PAGE.into()),
        ("contribute_page", PLACEHOLDER_PAGE.into()),
        ("faq_page", PLACEHOLDER_PAGE.into()),
        ("missing_place_html", "".into()),
        ("user_database_key", "0AqR8dXc6Ji4JdGJXallkcjNOaFlmN1N5MXZkM1ZSbUE".into()),
        (
            "questions",
            "https://docs.google.com/a/okfn.org/spreadsheet/ccc?key=0AqR8dXc6Ji4JdFI0QkpGUEZyS0wxYWtLdG1nTk9zU3c#gid=0"
                .into(),
        ),
        ("debug", false.into()),
        ("database.username", "opendatacensus".into()),
        ("database.password", "".into()),
        ("database.database", "opendatacensus".into()),
        ("database.host", "localhost".into()),
        ("database.port", 5432_i64.into()),
        ("database.dialect", "postgres".into()),
        ("appconfig.port", 5000_i64.into()),
        ("appconfig.auth_on", false.into()),
        ("appconfig.readonly", false.into()),
    ]
}
