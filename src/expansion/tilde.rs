use std::borrow::Cow;
use std::env;
use std::path::PathBuf;

use log::debug;
use nix::unistd::{Uid, User};

use super::ExpansionContext;

/// Replace a leading `~` or `~user` with the matching home directory.
///
/// A user without a home directory record leaves the word untouched.
pub fn expand_tilde<'w>(word: &'w str, ctx: &ExpansionContext<'_>) -> Cow<'w, str> {
    let Some(rest) = word.strip_prefix('~') else {
        return Cow::Borrowed(word);
    };
    let (user, tail) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };
    let home = if user.is_empty() {
        (ctx.lookup_var)("HOME")
            .map(PathBuf::from)
            .or_else(|| (ctx.lookup_home)(None))
    } else {
        (ctx.lookup_home)(Some(user))
    };
    match home {
        Some(home) => Cow::Owned(format!("{}{tail}", home.display())),
        None => {
            debug!("no home directory for ~{user}, leaving {word:?} as is");
            Cow::Borrowed(word)
        }
    }
}

/// Home directory from the user database; `None` asks for the current user.
pub fn home_from_system(user: Option<&str>) -> Option<PathBuf> {
    let record = match user {
        Some(name) => User::from_name(name),
        None => {
            if let Some(home) = env::var_os("HOME") {
                return Some(PathBuf::from(home));
            }
            User::from_uid(Uid::current())
        }
    };
    match record {
        Ok(record) => record.map(|user| user.dir),
        Err(err) => {
            debug!("user lookup failed: {err}");
            None
        }
    }
}
