pub mod debit_card;
