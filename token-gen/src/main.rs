use clap::Parser;
use jsonwebtoken::{EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

/// Mint an HS256 access token for the notes API (development only).
///
/// The token carries:
/// - `sub` (the note owner), `exp`, `iat`, `jti`
/// - `type` = access | refresh
/// - `fresh` = true, false, or a unix timestamp (with --fresh-for-seconds)
///
/// Example:
///   curl -H "Authorization: Bearer $(token-gen --sub alice --fresh -q)" localhost:3000/note
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Owner identity placed in `sub`
    #[arg(long)]
    sub: String,

    /// Shared secret (same value as the server's JWT_SECRET_KEY)
    #[arg(long, env = "JWT_SECRET_KEY", hide_env_values = true)]
    secret: String,

    /// Mark the token fresh (required for PUT/DELETE)
    #[arg(long, default_value_t = false, conflicts_with = "fresh_for_seconds")]
    fresh: bool,

    /// Fresh only until now + N seconds
    #[arg(long)]
    fresh_for_seconds: Option<i64>,

    /// Token lifetime in seconds
    #[arg(long, default_value_t = 900)]
    ttl_seconds: i64,

    /// Issue a refresh token instead (the API rejects these; useful for testing)
    #[arg(long, default_value_t = false)]
    refresh: bool,

    /// Optional `iss` claim
    #[arg(long, env = "AUTH_ISSUER")]
    issuer: Option<String>,

    /// Optional `aud` claim
    #[arg(long, env = "AUTH_AUDIENCE")]
    audience: Option<String>,

    /// Print only the token (no extra lines)
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Fresh {
    Flag(bool),
    Until(i64),
}

#[derive(Debug, Serialize)]
struct Claims {
    sub: String,
    iat: i64,
    nbf: i64,
    exp: i64,
    jti: String,
    #[serde(rename = "type")]
    token_type: &'static str,
    fresh: Fresh,
    #[serde(skip_serializing_if = "Option::is_none")]
    iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.sub.trim().is_empty() {
        return Err("--sub must not be empty".into());
    }
    if args.ttl_seconds <= 0 {
        return Err("--ttl-seconds must be positive".into());
    }

    let now = chrono::Utc::now().timestamp();
    let fresh = match args.fresh_for_seconds {
        Some(secs) => Fresh::Until(now + secs),
        None => Fresh::Flag(args.fresh),
    };

    let claims = Claims {
        sub: args.sub,
        iat: now,
        nbf: now,
        exp: now + args.ttl_seconds,
        jti: Uuid::new_v4().to_string(),
        token_type: if args.refresh { "refresh" } else { "access" },
        fresh,
        iss: args.issuer,
        aud: args.audience,
    };

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(args.secret.as_bytes()),
    )?;

    if args.quiet {
        println!("{}", token);
        return Ok(());
    }

    println!("token: {}", token);
    println!("claims: {}", serde_json::to_string_pretty(&claims)?);

    Ok(())
}
