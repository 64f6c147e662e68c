use super::TableService;
use crate::database::models::PrinterModel;
use crate::database::BackendClient;
use crate::types::Locale;

pub const PRINTER_MODEL_TABLE: &str = "modelos_impresora";

pub type PrinterModelService = TableService<PrinterModel>;

impl TableService<PrinterModel> {
    pub fn new(client: BackendClient, locale: Locale) -> Self {
        Self::with_table(client, PRINTER_MODEL_TABLE, "modelo", "created_at desc", locale)
    }
}
