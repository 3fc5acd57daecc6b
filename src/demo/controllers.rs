use anyhow::Context;
use std::sync::Arc;

use super::components::{Greeter, UserDirectory};
use crate::dispatcher::{Actions, Call, Controller};
use crate::ioc::Inject;
use crate::outcome::Outcome;
use crate::route::RouteBuilder;
use crate::server::html_escape;

#[derive(Default, Inject)]
pub struct Index {
    #[inject]
    greeter: Option<Arc<dyn Greeter>>,
}

impl Index {
    fn index(&mut self, call: &Call<'_>) -> anyhow::Result<String> {
        let name: String = call
            .optional("name")?
            .unwrap_or_else(|| "guest".to_string());
        let greeting = match &self.greeter {
            Some(greeter) => greeter.greet(&name),
            None => format!("Hello, {name}."),
        };
        Ok(format!("<h1>{}</h1>", html_escape(&greeting)))
    }
}

impl Controller for Index {
    fn actions(actions: &mut Actions<Self>) {
        actions.add("index", Index::index);
    }
}

#[derive(Default, Inject)]
pub struct Users {
    #[inject(name = "users")]
    directory: Option<Arc<dyn UserDirectory>>,
}

impl Users {
    fn directory(&self) -> anyhow::Result<&dyn UserDirectory> {
        self.directory
            .as_deref()
            .context("no user directory is configured")
    }

    fn index(&mut self, _call: &Call<'_>) -> anyhow::Result<String> {
        let items: String = self
            .directory()?
            .all()
            .iter()
            .map(|u| format!("<li><a href=\"users/show?id={}\">{}</a></li>", u.id, html_escape(&u.name)))
            .collect();
        Ok(format!("<ul>{items}</ul>"))
    }

    fn show(&mut self, call: &Call<'_>) -> anyhow::Result<Outcome> {
        let id: u64 = call.param("id")?;
        Ok(match self.directory()?.find(id) {
            Some(user) => Outcome::success(format!("<h1>{}</h1><p>id {}</p>", html_escape(&user.name), user.id)),
            None => Outcome::not_found(format!("no user with id {id}")),
        })
    }

    fn login(&mut self, call: &Call<'_>) -> anyhow::Result<Outcome> {
        let id: u64 = call.param("id")?;
        if self.directory()?.find(id).is_none() {
            return Ok(Outcome::not_found(format!("no user with id {id}")));
        }
        call.context().set_user_id(id.to_string())?;
        Ok(Outcome::redirect(call.redirect_to("users", "me")))
    }

    fn logout(&mut self, call: &Call<'_>) -> anyhow::Result<RouteBuilder> {
        call.context().clear_user_id()?;
        Ok(call.redirect_to("index", "index").param("signed_out", true))
    }

    fn me(&mut self, call: &Call<'_>) -> anyhow::Result<Outcome> {
        let Some(user_id) = call.user_id()? else {
            return Ok(Outcome::redirect(call.redirect_to("users", "index")));
        };
        let id: u64 = user_id.parse().context("session holds a malformed user id")?;
        let user = self
            .directory()?
            .find(id)
            .with_context(|| format!("signed-in user {id} no longer exists"))?;
        Ok(Outcome::success(format!("<p>Signed in as {}</p>", html_escape(&user.name))))
    }
}

impl Controller for Users {
    fn actions(actions: &mut Actions<Self>) {
        actions.add("index", Users::index);
        actions.add("show", Users::show).requires(["id"]);
        actions.add("login", Users::login).requires(["id"]);
        actions.add("logout", Users::logout);
        actions.add("me", Users::me);
    }
}
