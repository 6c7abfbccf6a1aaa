pub mod env {
    pub const APP_ENVIRONMENT_ENV_VAR: &str = "APP_ENVIRONMENT";
    /// Prefix of overriding variables, e.g. `LATCHKEY__JWT__SECRET`.
    pub const SETTINGS_ENV_PREFIX: &str = "LATCHKEY";
    pub const SETTINGS_ENV_SEPARATOR: &str = "__";
}

pub const CONFIG_DIR: &str = "config";
pub const DEFAULT_ENVIRONMENT: &str = "local";

pub const JWT_COOKIE_NAME: &str = "jwt";

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
    pub const REQUEST_TIMEOUT_MILLIS: u64 = 10_000;

    pub mod postgres {
        pub const MAX_CONNECTIONS: u32 = 5;
    }

    pub mod jwt {
        pub const TTL_SECONDS: i64 = 3600;
        pub const ISSUER: &str = "latchkey";
        pub const ROLE: &str = "user";
    }

    pub mod activation {
        pub const TTL_HOURS: i64 = 24;
        pub const LINK_BASE_URL: &str = "http://localhost:3000/activate";
    }

    pub mod email_client {
        pub const BASE_URL: &str = "https://api.postmarkapp.com/";
        pub const SENDER: &str = "no-reply@latchkey.dev";
        pub const TIMEOUT_MILLIS: u64 = 10_000;
    }
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";

    pub mod email_client {
        use std::time::Duration;

        pub const SENDER: &str = "test@email.com";
        pub const TIMEOUT: Duration = Duration::from_millis(200);
    }
}
