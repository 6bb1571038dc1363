//! Numbered menu loop over the inventory service.
//!
//! Commands live in a dispatch table of `(key, label, handler)` entries;
//! handlers report repository errors to the user and keep the loop alive.
//! Only terminal I/O failures end the session with an error, and end of
//! input ends it cleanly.

use chrono::{DateTime, Local};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};
use std::str::FromStr;
use stockroom_core::{InventoryService, Record, RecordStore, RepoResult};

/// Terminal-level failure that ends the session.
#[derive(Debug)]
pub enum MenuError {
    EndOfInput,
    Io(std::io::Error),
}

impl Display for MenuError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOfInput => write!(f, "end of input"),
            Self::Io(err) => write!(f, "terminal i/o failed: {err}"),
        }
    }
}

impl Error for MenuError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::EndOfInput => None,
        }
    }
}

impl From<std::io::Error> for MenuError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

pub type MenuResult<T> = Result<T, MenuError>;
type Handler<S, R, W> = fn(&mut Session<S, R, W>) -> MenuResult<()>;

struct Command<S: RecordStore, R, W> {
    key: &'static str,
    label: &'static str,
    run: Handler<S, R, W>,
}

fn command_table<S: RecordStore, R: BufRead, W: Write>() -> [Command<S, R, W>; 10] {
    [
        Command {
            key: "1",
            label: "Add product",
            run: Session::add_product,
        },
        Command {
            key: "2",
            label: "Remove product",
            run: Session::remove_product,
        },
        Command {
            key: "3",
            label: "Update quantity",
            run: Session::update_quantity,
        },
        Command {
            key: "4",
            label: "Update price",
            run: Session::update_price,
        },
        Command {
            key: "5",
            label: "Restock",
            run: Session::restock,
        },
        Command {
            key: "6",
            label: "Search by name",
            run: Session::search,
        },
        Command {
            key: "7",
            label: "List all",
            run: Session::list_all,
        },
        Command {
            key: "8",
            label: "Statistics",
            run: Session::statistics,
        },
        Command {
            key: "9",
            label: "Out of stock",
            run: Session::out_of_stock,
        },
        Command {
            key: "10",
            label: "Create backup",
            run: Session::backup,
        },
    ]
}

/// One interactive session bound to an input and an output stream.
pub struct Session<S: RecordStore, R, W> {
    service: InventoryService<S>,
    input: R,
    output: W,
}

impl<S: RecordStore, R: BufRead, W: Write> Session<S, R, W> {
    pub fn new(service: InventoryService<S>, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Runs until `0` is chosen or input ends.
    pub fn run(&mut self) -> MenuResult<()> {
        let commands = command_table::<S, R, W>();
        loop {
            self.print_menu(&commands)?;
            let choice = match self.ask("Option: ") {
                Ok(choice) => choice,
                Err(MenuError::EndOfInput) => break,
                Err(err) => return Err(err),
            };

            if choice == "0" {
                break;
            }
            let outcome = match commands.iter().find(|command| command.key == choice) {
                Some(command) => (command.run)(self),
                None => self.say("Invalid option"),
            };
            match outcome {
                Ok(()) => {}
                Err(MenuError::EndOfInput) => break,
                Err(err) => return Err(err),
            }
        }

        self.say("Goodbye!")
    }

    fn print_menu(&mut self, commands: &[Command<S, R, W>]) -> MenuResult<()> {
        writeln!(self.output, "\n{}", "=".repeat(40))?;
        writeln!(self.output, "INVENTORY")?;
        writeln!(self.output, "{}", "=".repeat(40))?;
        for command in commands {
            writeln!(self.output, "{}. {}", command.key, command.label)?;
        }
        writeln!(self.output, "0. Quit")?;
        Ok(())
    }

    fn add_product(&mut self) -> MenuResult<()> {
        let id = self.ask("ID: ")?;
        let name = self.ask("Name: ")?;
        let Some(quantity) = self.ask_number::<i64>("Quantity: ")? else {
            return Ok(());
        };
        let Some(price) = self.ask_number::<f64>("Price: $")? else {
            return Ok(());
        };
        let result = self.service.add_product(&id, &name, quantity, price);
        self.report(result, |id| format!("Product {id} added"))
    }

    fn remove_product(&mut self) -> MenuResult<()> {
        let id = self.ask("ID: ")?;
        let Some(record) = self.service.get_product(&id) else {
            return self.say("Product not found");
        };
        self.say(&format!("Product: {record}"))?;
        if !self.ask("Remove? (y/N): ")?.eq_ignore_ascii_case("y") {
            return self.say("Cancelled");
        }
        let result = self.service.remove_product(&id);
        self.report(result, |removed| format!("Removed {}", removed.id()))
    }

    fn update_quantity(&mut self) -> MenuResult<()> {
        let id = self.ask("ID: ")?;
        let Some(quantity) = self.ask_number::<i64>("New quantity: ")? else {
            return Ok(());
        };
        let result = self.service.set_quantity(&id, quantity);
        self.report(result, |record| format!("Updated: {record}"))
    }

    fn update_price(&mut self) -> MenuResult<()> {
        let id = self.ask("ID: ")?;
        let Some(price) = self.ask_number::<f64>("New price: $")? else {
            return Ok(());
        };
        let result = self.service.set_price(&id, price);
        self.report(result, |record| format!("Updated: {record}"))
    }

    fn restock(&mut self) -> MenuResult<()> {
        let id = self.ask("ID: ")?;
        let Some(delta) = self.ask_number::<i64>("Change (+/-): ")? else {
            return Ok(());
        };
        let result = self.service.restock(&id, delta);
        self.report(result, |record| format!("Updated: {record}"))
    }

    fn search(&mut self) -> MenuResult<()> {
        let needle = self.ask("Name contains: ")?;
        let records = self.service.find_by_name(&needle);
        self.print_records(&records, "No matching products")
    }

    fn list_all(&mut self) -> MenuResult<()> {
        let report = self.service.report();
        self.print_records(&report.records, "No products")?;
        if !report.records.is_empty() {
            self.say(&format!("Total value: ${:.2}", report.summary.total_value))?;
        }
        Ok(())
    }

    fn statistics(&mut self) -> MenuResult<()> {
        let summary = self.service.report().summary;
        let Some(average_price) = summary.average_price else {
            return self.say("No data");
        };
        self.say(&format!("Products: {}", summary.count))?;
        self.say(&format!("Items in stock: {}", summary.total_quantity))?;
        self.say(&format!("Total value: ${:.2}", summary.total_value))?;
        self.say(&format!("Out of stock: {}", summary.out_of_stock_count))?;
        self.say(&format!("Average price: ${average_price:.2}"))
    }

    fn out_of_stock(&mut self) -> MenuResult<()> {
        let records = self.service.out_of_stock();
        self.print_records(&records, "Every product is in stock")
    }

    fn backup(&mut self) -> MenuResult<()> {
        let answer = self.ask("Backup file (blank for default): ")?;
        let target = if answer.is_empty() {
            default_backup_name(Local::now())
        } else {
            answer
        };
        match self.service.repository().backup_to(&target) {
            Ok(()) => self.say(&format!("Backup written to {target}")),
            Err(err) => self.say(&format!("Error: {err}")),
        }
    }

    fn print_records(&mut self, records: &[Record], empty_message: &str) -> MenuResult<()> {
        if records.is_empty() {
            return self.say(empty_message);
        }
        for (position, record) in records.iter().enumerate() {
            writeln!(self.output, "{:2}. {record}", position + 1)?;
        }
        Ok(())
    }

    fn report<T>(
        &mut self,
        result: RepoResult<T>,
        success: impl FnOnce(T) -> String,
    ) -> MenuResult<()> {
        match result {
            Ok(value) => self.say(&success(value)),
            Err(err) => self.say(&format!("Error: {err}")),
        }
    }

    fn say(&mut self, message: &str) -> MenuResult<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn ask(&mut self, label: &str) -> MenuResult<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(MenuError::EndOfInput);
        }
        Ok(line.trim().to_string())
    }

    /// Returns `None` (after telling the user) when the input is not a number.
    fn ask_number<T: FromStr>(&mut self, label: &str) -> MenuResult<Option<T>> {
        let raw = self.ask(label)?;
        match raw.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                self.say(&format!("Invalid number: `{raw}`"))?;
                Ok(None)
            }
        }
    }
}

/// Timestamped file name used when the user does not pick one.
fn default_backup_name(now: DateTime<Local>) -> String {
    now.format("inventory_backup_%Y%m%d_%H%M%S.json").to_string()
}
