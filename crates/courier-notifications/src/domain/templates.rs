//! Message templates keyed by order status.

use courier_core::order::OrderStatus;

/// Placeholder replaced with the order reference.
const REFERENCE_PLACEHOLDER: &str = "{ref}";

/// A title and message pair for one audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Notification title.
    pub title: &'static str,
    /// Message body; `{ref}` is replaced with the order reference.
    pub message: &'static str,
}

impl Template {
    /// Renders the message for the given order reference.
    #[must_use]
    pub fn render_message(&self, reference: &str) -> String {
        self.message.replace(REFERENCE_PLACEHOLDER, reference)
    }
}

/// The templates defined for one status, per audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTemplates {
    /// Sent to the order's customer.
    pub customer: Option<Template>,
    /// Broadcast to every admin.
    pub admin: Option<Template>,
    /// Broadcast to every delivery agent.
    pub delivery: Option<Template>,
}

/// Looks up the templates for `status`. `pending` has no entry.
#[must_use]
pub fn templates_for(status: OrderStatus) -> Option<StatusTemplates> {
    let templates = match status {
        OrderStatus::Pending => return None,
        OrderStatus::Confirmed => StatusTemplates {
            customer: Some(Template {
                title: "Pedido Confirmado!",
                message: "Seu pedido {ref} foi confirmado e está sendo preparado.",
            }),
            admin: Some(Template {
                title: "Novo Pedido Confirmado",
                message: "Pedido {ref} foi confirmado e deve ser preparado.",
            }),
            delivery: None,
        },
        OrderStatus::Preparing => StatusTemplates {
            customer: Some(Template {
                title: "Preparando seu Pedido",
                message: "Seu pedido {ref} está sendo preparado com carinho!",
            }),
            admin: None,
            delivery: None,
        },
        OrderStatus::Ready => StatusTemplates {
            customer: Some(Template {
                title: "Pedido Pronto!",
                message: "Seu pedido {ref} está pronto e será entregue em breve.",
            }),
            admin: None,
            delivery: Some(Template {
                title: "Novo Pedido para Entrega",
                message: "Pedido {ref} está pronto para entrega.",
            }),
        },
        OrderStatus::Delivering => StatusTemplates {
            customer: Some(Template {
                title: "Pedido a Caminho!",
                message: "Seu pedido {ref} saiu para entrega. Em breve estará aí!",
            }),
            admin: None,
            delivery: None,
        },
        OrderStatus::Delivered => StatusTemplates {
            customer: Some(Template {
                title: "Pedido Entregue!",
                message: "Seu pedido {ref} foi entregue com sucesso. Obrigado!",
            }),
            admin: Some(Template {
                title: "Pedido Entregue",
                message: "Pedido {ref} foi entregue com sucesso.",
            }),
            delivery: None,
        },
        OrderStatus::Cancelled => StatusTemplates {
            customer: Some(Template {
                title: "Pedido Cancelado",
                message: "Seu pedido {ref} foi cancelado. Entre em contato conosco para mais informações.",
            }),
            admin: Some(Template {
                title: "Pedido Cancelado",
                message: "Pedido {ref} foi cancelado.",
            }),
            delivery: None,
        },
    };
    Some(templates)
}
