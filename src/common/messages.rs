// src/common/messages.rs

use crate::middleware::i18n::Locale;

/// Mensagem legível para um código de erro, no idioma do cliente.
/// Idiomas sem tradução caem para inglês.
pub fn translate(code: &str, locale: &Locale) -> &'static str {
    match locale.0.as_str() {
        "pt" => pt(code),
        _ => en(code),
    }
}

fn en(code: &str) -> &'static str {
    match code {
        "validation_failed" => "One or more fields are invalid.",
        "empty_order" => "An order must contain at least one item.",
        "invalid_quantity" => "Item quantity must be between 1 and 1000.",
        "amount_out_of_range" => "An amount is too large to be stored.",
        "invalid_order_type" => "Unknown order type.",
        "invalid_status" => "Unknown order status.",
        "invalid_payment_method" => "Unknown payment method.",
        "invalid_amount" => "Payment amount must be greater than zero.",
        "auth_required" => "Authentication required.",
        "order_not_found" => "Order not found.",
        "product_unavailable" => "Product not found or not available.",
        "table_not_found" => "Table not found.",
        "order_terminal" => "The order is already completed or cancelled.",
        "order_fully_paid" => "The order is already fully paid.",
        "amount_exceeds_balance" => "Payment amount exceeds the remaining balance.",
        "order_number_conflict" => "Could not allocate a unique order number, try again.",
        _ => "An unexpected error occurred.",
    }
}

fn pt(code: &str) -> &'static str {
    match code {
        "validation_failed" => "Um ou mais campos são inválidos.",
        "empty_order" => "O pedido deve conter pelo menos um item.",
        "invalid_quantity" => "A quantidade do item deve estar entre 1 e 1000.",
        "amount_out_of_range" => "Um valor é grande demais para ser armazenado.",
        "invalid_order_type" => "Tipo de pedido desconhecido.",
        "invalid_status" => "Status de pedido desconhecido.",
        "invalid_payment_method" => "Forma de pagamento desconhecida.",
        "invalid_amount" => "O valor do pagamento deve ser maior que zero.",
        "auth_required" => "Autenticação necessária.",
        "order_not_found" => "Pedido não encontrado.",
        "product_unavailable" => "Produto não encontrado ou indisponível.",
        "table_not_found" => "Mesa não encontrada.",
        "order_terminal" => "O pedido já foi finalizado ou cancelado.",
        "order_fully_paid" => "O pedido já está totalmente pago.",
        "amount_exceeds_balance" => "O valor excede o saldo restante do pedido.",
        "order_number_conflict" => "Não foi possível gerar um número de pedido único, tente novamente.",
        _ => "Ocorreu um erro inesperado.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(translate("order_terminal", &Locale("de".into())), en("order_terminal"));
    }

    #[test]
    fn unknown_code_gets_generic_message() {
        assert_eq!(translate("nope", &Locale("pt".into())), "Ocorreu um erro inesperado.");
    }
}
