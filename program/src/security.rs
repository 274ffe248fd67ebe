#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "Crowdsale Settlement Program",
    project_url: "https://github.com/crowdsale/crowdsale-program",
    contacts: "email:security@crowdsale.dev",
    policy: "https://github.com/crowdsale/crowdsale-program/blob/main/SECURITY.md",
    source_code: "https://github.com/crowdsale/crowdsale-program"
}
