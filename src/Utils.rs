/// loading and saving of tasks in JSON
pub mod load_from_file;
