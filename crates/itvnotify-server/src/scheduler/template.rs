//! Notification body rendering.
//!
//! The decision logic hands over structured fields only; all HTML assembly
//! happens here with tera's autoescaping so driver or vehicle names can never
//! inject markup into the message.

use tera::{Context, Tera};

use itvnotify_core::error::SendError;
use itvnotify_core::record::InspectionRecord;

const HTML_TEMPLATE: &str = include_str!("../../templates/notification.html");

pub struct RenderedBody {
    pub text: String,
    pub html: String,
}

pub fn render(record: &InspectionRecord) -> Result<RenderedBody, SendError> {
    let mut ctx = Context::new();
    ctx.insert("driver_first_name", &record.driver_first_name);
    ctx.insert("vehicle_name", &record.vehicle_name);
    ctx.insert("inspection_date", &record.inspection_date);

    let html = Tera::one_off(HTML_TEMPLATE, &ctx, true)
        .map_err(|e| SendError::Render(e.to_string()))?;
    let text = format!(
        "Hola {},\n\nEl vehiculo {} tiene programada su proxima ITV el {}.\n\
         Por favor, recuerda pasar la inspeccion antes de esa fecha.\n",
        record.driver_first_name, record.vehicle_name, record.inspection_date
    );
    Ok(RenderedBody { text, html })
}
