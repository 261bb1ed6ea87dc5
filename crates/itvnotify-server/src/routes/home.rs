/// `GET /` — liveness text. Used by the `itvnotify health` probe and by
/// platform healthchecks.
pub async fn home() -> &'static str {
    "itvnotify ok"
}
