mod command_log_entry;
