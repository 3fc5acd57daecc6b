#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use brrtmvc::dispatcher::{Actions, Call, Controller, ControllerRegistry, Invoker};
use brrtmvc::ioc::{Container, Inject};
use brrtmvc::outcome::Outcome;
use brrtmvc::route::{Params, Route, RouteContext};

/// Write `content` to `dir/name`, creating `dir` if needed.
pub fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), content).unwrap();
}

/// Route rooted at `/` with no session, params taken from the query.
pub fn route(path: &str) -> Route {
    Route::detached(path)
}

/// Route mounted at `mount` with explicit params and no session.
pub fn mounted_route(mount: &str, path: &str, params: Params) -> Route {
    Route::from_request(path, params, Arc::new(RouteContext::detached(mount)))
}

/// Controller exercising every outcome path.
#[derive(Default, Inject)]
pub struct Fixture;

impl Fixture {
    fn echo(&mut self, call: &Call<'_>) -> anyhow::Result<String> {
        let text: String = call.param("text")?;
        Ok(text)
    }

    fn count(&mut self, call: &Call<'_>) -> anyhow::Result<String> {
        let n: i32 = call.param("n")?;
        Ok(format!("n={n}"))
    }

    fn fail(&mut self, _call: &Call<'_>) -> anyhow::Result<Outcome> {
        Err(anyhow::anyhow!("database unavailable").context("loading fixture"))
    }

    fn explode(&mut self, _call: &Call<'_>) -> anyhow::Result<String> {
        panic!("fixture exploded");
    }

    fn jump(&mut self, call: &Call<'_>) -> anyhow::Result<Route> {
        Ok(call
            .redirect_to("fixture", "landing")
            .param("a", 1)
            .param("a", 2)
            .param("b", "x")
            .build())
    }

    fn nothing(&mut self, _call: &Call<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn json(&mut self, _call: &Call<'_>) -> anyhow::Result<serde_json::Value> {
        Ok(serde_json::json!({ "ok": true }))
    }
}

impl Controller for Fixture {
    fn actions(actions: &mut Actions<Self>) {
        actions.add("echo", Fixture::echo);
        actions.add("count", Fixture::count).requires(["n"]);
        actions.add("fail", Fixture::fail);
        actions.add("explode", Fixture::explode);
        actions.add("jump", Fixture::jump);
        actions.add("nothing", Fixture::nothing);
        actions.add("json", Fixture::json);
    }
}

/// Invoker with `Fixture` registered as `controllers.Fixture`.
pub fn fixture_invoker() -> Invoker {
    let registry = ControllerRegistry::new().with::<Fixture>("controllers.Fixture");
    Invoker::new(None, registry, Arc::new(Container::new()))
}
