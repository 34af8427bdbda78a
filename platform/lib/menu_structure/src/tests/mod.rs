mod structured;
