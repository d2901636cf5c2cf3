//! Response rendering.
//!
//! # Responsibilities
//! - Render the fixed pages (sign-in, not found)
//! - Render the per-identity survey page
//! - Render redirects back to a GET after every POST
//! - Serialize a response to wire bytes
//!
//! # Design Decisions
//! - Pure functions from state to bytes, no I/O
//! - Every response is `text/html` with `Connection: close`
//! - Username and transcript are embedded as typed, without HTML escaping

/// Status lines produced by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    SeeOther,
    NotFound,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::SeeOther => 303,
            Status::NotFound => 404,
        }
    }

    fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::SeeOther => "See Other",
            Status::NotFound => "Not Found",
        }
    }
}

/// A rendered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    /// Target of a redirect.
    pub location: Option<String>,
    pub body: String,
}

impl Response {
    fn html(status: Status, body: String) -> Self {
        Self {
            status,
            location: None,
            body,
        }
    }

    /// Serialize status line, headers and body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: text/html\r\n",
            self.status.code(),
            self.status.reason()
        );
        if let Some(location) = &self.location {
            head.push_str(&format!("Location: {}\r\n", location));
        }
        head.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n",
            self.body.len()
        ));

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

const SIGNIN_BODY: &str = r#"<html><head>
   <h3>Sign in</h3>
   <form action=/signin method="post">
      Username: <input type = "text" name = "username" value = ""><br>
      Password: <input type = "password" name = "password" value = ""><br>
      <input type="submit" value="Log in">
   </form>
</head></html>
"#;

const NOT_FOUND_BODY: &str = r#"<html><head>
<h1>Page not Found</h1>
<p>Please <a href="/signin">sign in</a></p>
</head></html>
"#;

/// The sign-in form. The password field is cosmetic.
pub fn signin_page() -> Response {
    Response::html(Status::Ok, SIGNIN_BODY.to_string())
}

/// Shown for unknown methods and paths.
pub fn not_found_page() -> Response {
    Response::html(Status::NotFound, NOT_FOUND_BODY.to_string())
}

/// 303 to `<public_url>/<slug>`.
pub fn redirect(public_url: &str, slug: &str) -> Response {
    Response {
        status: Status::SeeOther,
        location: Some(format!("{}/{}", public_url, slug)),
        body: String::new(),
    }
}

/// The survey page: transcript so far plus an input form scoped to `username`.
pub fn survey_page(username: &str, transcript: &str) -> Response {
    let body = format!(
        r#"<html><head>
<h3>Hi, {username}</h3>
<p>Please answer the questions as truthfully as possible</p>
<textarea style="width: 500px; height: 500px; padding: 5px; border: 2px solid gray; border-radius: 3px">{transcript}</textarea><br>
<form style="margin-top: 10px" action=/input/{username} method="post">
   Input: <input type = "text" name = "client-input" value = "">
   <input type="submit" value="submit">
</form>
</head></html>
"#
    );
    Response::html(Status::Ok, body)
}
